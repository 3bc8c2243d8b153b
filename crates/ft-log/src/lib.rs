//! Persistent focus log.
//!
//! The log is a flat, append-only text file with one [`LogRecord`] per line.
//! A [`FocusLog`] is opened once at startup and holds the file handle until
//! it is dropped.
//!
//! # Concurrency
//!
//! Each append takes an advisory exclusive lock on the file for the duration
//! of the write, so two trackers pointed at the same file never interleave
//! partial lines.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use fs2::FileExt;
use thiserror::Error;

use ft_core::LogRecord;

/// Focus log errors.
#[derive(Debug, Error)]
pub enum LogError {
    /// The log file could not be opened or created.
    #[error("failed to open focus log {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A record could not be written.
    #[error("failed to write focus log {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The log could not be read back.
    #[error("failed to read focus log {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Append-only handle to the focus log.
#[derive(Debug)]
pub struct FocusLog {
    file: File,
    path: PathBuf,
}

impl FocusLog {
    /// Opens the log for appending, creating the file and any missing parent
    /// directories.
    pub fn open(path: &Path) -> Result<Self, LogError> {
        let open_err = |source| LogError::Open {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(open_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(open_err)?;
        tracing::debug!(path = %path.display(), "opened focus log");
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record as a single line.
    pub fn append(&mut self, record: &LogRecord) -> Result<(), LogError> {
        let write_err = |source| LogError::Write {
            path: self.path.clone(),
            source,
        };

        self.file.lock_exclusive().map_err(write_err)?;
        let line = format!("{record}\n");
        let written = self
            .file
            .write_all(line.as_bytes())
            .and_then(|()| self.file.flush());
        let unlocked = FileExt::unlock(&self.file);
        written.map_err(write_err)?;
        unlocked.map_err(write_err)?;

        tracing::debug!(kind = %record.kind, "appended focus log record");
        Ok(())
    }
}

/// Converts an instant to the local wall-clock time used in log lines.
pub fn local_time(at: DateTime<Utc>) -> NaiveDateTime {
    wall_time(at, &Local)
}

/// Converts an instant to the wall-clock time of `tz`.
pub fn wall_time<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> NaiveDateTime {
    at.with_timezone(tz).naive_local()
}

/// Reads every well-formed record from the log.
///
/// A missing file reads as an empty log. Lines that do not parse are skipped.
pub fn read_records(path: &Path) -> Result<Vec<LogRecord>, LogError> {
    let read_err = |source| LogError::Read {
        path: path.to_path_buf(),
        source,
    };

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(read_err(e)),
    };

    let mut records = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(read_err)?;
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<LogRecord>() {
            Ok(record) => records.push(record),
            Err(e) => tracing::trace!(error = %e, "skipping malformed log line"),
        }
    }
    Ok(records)
}

/// Reads the last `n` well-formed records, oldest first.
pub fn recent_records(path: &Path, n: usize) -> Result<Vec<LogRecord>, LogError> {
    let mut records = read_records(path)?;
    let skip = records.len().saturating_sub(n);
    records.drain(..skip);
    Ok(records)
}
