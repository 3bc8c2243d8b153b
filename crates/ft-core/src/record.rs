//! Focus log lines.
//!
//! Each line is prefixed with a local wall-clock timestamp in the classic
//! logger layout:
//!
//! ```text
//! 2025/01/01 09:06:00 Session Focus Time: 00h:06m:00s
//! 2025/01/01 17:30:12 Total Focus Time: 02h:41m:09s
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use thiserror::Error;

use crate::duration::{DurationParseError, format_duration, parse_duration};

/// Timestamp layout of the line prefix.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Length of a rendered [`TIMESTAMP_FORMAT`] prefix.
const TIMESTAMP_LEN: usize = "2006/01/02 15:04:05".len();

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    #[error("line too short for a timestamp prefix")]
    MissingTimestamp,
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("unknown record label: {0}")]
    UnknownLabel(String),
    #[error(transparent)]
    Duration(#[from] DurationParseError),
}

/// What a log line records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// A single session that passed the duration filter.
    Session,
    /// The cumulative total written at shutdown.
    Total,
}

impl RecordKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Session => "Session Focus Time",
            Self::Total => "Total Focus Time",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One line of the focus log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord {
    pub kind: RecordKind,
    /// Local wall-clock time the record was written for.
    pub at: NaiveDateTime,
    pub duration: Duration,
}

impl LogRecord {
    pub const fn session(at: NaiveDateTime, duration: Duration) -> Self {
        Self {
            kind: RecordKind::Session,
            at,
            duration,
        }
    }

    pub const fn total(at: NaiveDateTime, duration: Duration) -> Self {
        Self {
            kind: RecordKind::Total,
            at,
            duration,
        }
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.at.format(TIMESTAMP_FORMAT),
            self.kind,
            format_duration(self.duration)
        )
    }
}

impl FromStr for LogRecord {
    type Err = RecordParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end();
        if line.len() < TIMESTAMP_LEN || !line.is_char_boundary(TIMESTAMP_LEN) {
            return Err(RecordParseError::MissingTimestamp);
        }
        let (stamp, rest) = line.split_at(TIMESTAMP_LEN);
        let at = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .map_err(|_| RecordParseError::InvalidTimestamp(stamp.to_string()))?;

        let rest = rest.trim_start();
        let (label, duration) = rest
            .split_once(": ")
            .ok_or_else(|| RecordParseError::UnknownLabel(rest.to_string()))?;

        let kind = match label {
            l if l == RecordKind::Session.label() => RecordKind::Session,
            l if l == RecordKind::Total.label() => RecordKind::Total,
            other => return Err(RecordParseError::UnknownLabel(other.to_string())),
        };

        Ok(Self {
            kind,
            at,
            duration: parse_duration(duration)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn renders_session_line() {
        let record = LogRecord::session(at(9, 6, 0), Duration::minutes(6));
        assert_eq!(
            record.to_string(),
            "2025/01/01 09:06:00 Session Focus Time: 00h:06m:00s"
        );
    }

    #[test]
    fn renders_total_line() {
        let record = LogRecord::total(at(17, 30, 12), Duration::seconds(2 * 3600 + 41 * 60 + 9));
        assert_eq!(
            record.to_string(),
            "2025/01/01 17:30:12 Total Focus Time: 02h:41m:09s"
        );
    }

    #[test]
    fn parses_rendered_lines() {
        let records = [
            LogRecord::session(at(9, 6, 0), Duration::seconds(59)),
            LogRecord::total(at(23, 59, 59), Duration::seconds(360_000)),
        ];
        for record in records {
            let parsed: LogRecord = record.to_string().parse().unwrap();
            assert_eq!(parsed, record);
        }
    }

    #[test]
    fn parse_tolerates_trailing_newline() {
        let parsed: LogRecord = "2025/01/01 09:06:00 Session Focus Time: 00h:06m:00s\n"
            .parse()
            .unwrap();
        assert_eq!(parsed.duration, Duration::minutes(6));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            "short".parse::<LogRecord>(),
            Err(RecordParseError::MissingTimestamp)
        );
        assert!(matches!(
            "2025-01-01 09:06:00 Session Focus Time: 00h:06m:00s".parse::<LogRecord>(),
            Err(RecordParseError::InvalidTimestamp(_))
        ));
        assert!(matches!(
            "2025/01/01 09:06:00 Idle Time: 00h:06m:00s".parse::<LogRecord>(),
            Err(RecordParseError::UnknownLabel(_))
        ));
        assert!(matches!(
            "2025/01/01 09:06:00 Session Focus Time: 6 minutes".parse::<LogRecord>(),
            Err(RecordParseError::Duration(_))
        ));
    }
}
