//! Fixed-width `HHh:MMm:SSs` duration strings used by the focus log.

use chrono::Duration;
use thiserror::Error;

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("expected HHh:MMm:SSs, got {0:?}")]
    Malformed(String),
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },
    #[error("hours overflow: {0}")]
    Overflow(String),
}

/// Formats a duration as `HHh:MMm:SSs`.
///
/// Sub-second precision is truncated and negative durations render as zero.
/// The hour field is padded to two digits but never truncated, so 100 hours
/// renders as `100h:00m:00s`.
pub fn format_duration(d: Duration) -> String {
    let total = d.num_seconds().max(0);
    let hours = total / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;
    format!("{hours:02}h:{minutes:02}m:{seconds:02}s")
}

/// Parses a string produced by [`format_duration`].
pub fn parse_duration(s: &str) -> Result<Duration, DurationParseError> {
    let malformed = || DurationParseError::Malformed(s.to_string());

    let (hours, rest) = s.split_once("h:").ok_or_else(malformed)?;
    let (minutes, rest) = rest.split_once("m:").ok_or_else(malformed)?;
    let seconds = rest.strip_suffix('s').ok_or_else(malformed)?;

    if hours.len() < 2 || minutes.len() != 2 || seconds.len() != 2 {
        return Err(malformed());
    }

    let hours = parse_digits(hours).ok_or_else(malformed)?;
    let minutes = parse_digits(minutes).ok_or_else(malformed)?;
    let seconds = parse_digits(seconds).ok_or_else(malformed)?;

    if minutes >= 60 {
        return Err(DurationParseError::OutOfRange {
            field: "minutes",
            value: minutes,
        });
    }
    if seconds >= 60 {
        return Err(DurationParseError::OutOfRange {
            field: "seconds",
            value: seconds,
        });
    }

    let total = hours
        .checked_mul(SECS_PER_HOUR)
        .and_then(|h| h.checked_add(minutes * SECS_PER_MINUTE + seconds))
        .ok_or_else(|| DurationParseError::Overflow(s.to_string()))?;

    Duration::try_seconds(total).ok_or_else(|| DurationParseError::Overflow(s.to_string()))
}

/// Parses a run of ASCII digits. Rejects signs and whitespace that
/// `str::parse` would otherwise let through.
fn parse_digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero() {
        assert_eq!(format_duration(Duration::zero()), "00h:00m:00s");
    }

    #[test]
    fn formats_seconds_minutes_hours() {
        assert_eq!(format_duration(Duration::seconds(59)), "00h:00m:59s");
        assert_eq!(format_duration(Duration::seconds(61)), "00h:01m:01s");
        assert_eq!(format_duration(Duration::seconds(3600)), "01h:00m:00s");
        assert_eq!(format_duration(Duration::seconds(3 * 3600 + 25 * 60 + 7)), "03h:25m:07s");
    }

    #[test]
    fn hours_are_not_wrapped_or_truncated() {
        assert_eq!(format_duration(Duration::hours(25)), "25h:00m:00s");
        assert_eq!(format_duration(Duration::seconds(360_000)), "100h:00m:00s");
        assert_eq!(format_duration(Duration::hours(1234)), "1234h:00m:00s");
    }

    #[test]
    fn truncates_subsecond_precision() {
        assert_eq!(format_duration(Duration::milliseconds(59_999)), "00h:00m:59s");
    }

    #[test]
    fn negative_renders_as_zero() {
        assert_eq!(format_duration(Duration::seconds(-5)), "00h:00m:00s");
    }

    #[test]
    fn roundtrip_preserves_total_seconds() {
        for secs in [0, 59, 3600, 360_000] {
            let d = Duration::seconds(secs);
            let parsed = parse_duration(&format_duration(d)).unwrap();
            assert_eq!(parsed.num_seconds(), secs, "roundtrip of {secs}s");
        }
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for input in [
            "",
            "1h:00m:00s",
            "00h:0m:00s",
            "00h:00m:00",
            "00:00:00",
            "-1h:00m:00s",
            "00h:00m: 1s",
            "aah:00m:00s",
        ] {
            assert!(
                matches!(parse_duration(input), Err(DurationParseError::Malformed(_))),
                "expected malformed for {input:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_out_of_range_fields() {
        assert_eq!(
            parse_duration("00h:60m:00s"),
            Err(DurationParseError::OutOfRange {
                field: "minutes",
                value: 60
            })
        );
        assert_eq!(
            parse_duration("00h:00m:75s"),
            Err(DurationParseError::OutOfRange {
                field: "seconds",
                value: 75
            })
        );
    }

    #[test]
    fn parse_rejects_overflowing_hours() {
        assert!(matches!(
            parse_duration("99999999999999999h:00m:00s"),
            Err(DurationParseError::Overflow(_))
        ));
    }
}
