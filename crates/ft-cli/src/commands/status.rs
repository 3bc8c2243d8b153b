//! Status command for showing configuration and recent focus sessions.

use std::io::Write;

use anyhow::Result;

use ft_core::format_duration;

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config, limit: usize) -> Result<()> {
    let records = ft_log::recent_records(&config.log_path, limit)?;

    writeln!(writer, "Focus tracker status")?;
    writeln!(writer, "Log: {}", config.log_path.display())?;
    writeln!(
        writer,
        "Minimum session: {}",
        format_duration(config.tracker.min_session())
    )?;
    writeln!(
        writer,
        "Webcam: {}",
        if ft_vision::WEBCAM_AVAILABLE {
            "available"
        } else {
            "not compiled in"
        }
    )?;

    if records.is_empty() {
        writeln!(writer, "No sessions recorded.")?;
        return Ok(());
    }

    writeln!(writer, "Recent entries:")?;
    for record in records {
        writeln!(writer, "- {record}")?;
    }

    Ok(())
}
