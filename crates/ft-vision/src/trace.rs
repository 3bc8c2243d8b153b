//! Recorded presence traces.
//!
//! A trace replays a sequence of detector outcomes without a camera. Each
//! non-empty line holds an offset in seconds from the start of the trace and
//! a presence flag:
//!
//! ```text
//! # offset  present
//! 0         1
//! 360       0
//! ```
//!
//! Offsets may be fractional, must not decrease, and may not exceed
//! [`MAX_OFFSET_DAYS`]. The flag accepts `1`, `0`, `true`, `false`, `yes` and
//! `no`. Text after `#` is ignored.

use std::collections::VecDeque;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};

use crate::VisionError;
use crate::source::{Captured, FrameSource, PresenceDetector};

/// Longest offset a trace may use (about a century).
pub const MAX_OFFSET_DAYS: i64 = 36_525;

/// One recorded detector outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceSample {
    pub offset: Duration,
    pub present: bool,
}

/// A parsed presence trace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceTrace {
    samples: Vec<TraceSample>,
}

impl PresenceTrace {
    pub fn load(path: &Path) -> Result<Self, VisionError> {
        let content = std::fs::read_to_string(path).map_err(|source| VisionError::TraceRead {
            path: path.to_path_buf(),
            source,
        })?;
        let trace: Self = content.parse()?;
        tracing::debug!(path = %path.display(), samples = trace.len(), "loaded presence trace");
        Ok(trace)
    }

    pub fn samples(&self) -> &[TraceSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Turns the trace into a frame source anchored at `start`.
    pub fn into_source(self, start: DateTime<Utc>) -> TraceSource {
        TraceSource {
            start,
            remaining: self.samples.into(),
        }
    }
}

impl FromStr for PresenceTrace {
    type Err = VisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut samples: Vec<TraceSample> = Vec::new();

        for (idx, raw) in s.lines().enumerate() {
            let line_no = idx + 1;
            let err = |message: String| VisionError::TraceParse {
                line: line_no,
                message,
            };

            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(offset), Some(flag), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(err(format!("expected `<offset> <present>`, got {line:?}")));
            };

            let secs: f64 = offset
                .parse()
                .map_err(|_| err(format!("invalid offset {offset:?}")))?;
            if !secs.is_finite() || secs < 0.0 {
                return Err(err(format!("offset must be a non-negative number, got {offset}")));
            }
            #[expect(
                clippy::cast_possible_truncation,
                reason = "offsets are bounded by Duration's range check below"
            )]
            let millis = (secs * 1000.0).round() as i64;
            let offset = Duration::try_milliseconds(millis)
                .filter(|offset| *offset <= Duration::days(MAX_OFFSET_DAYS))
                .ok_or_else(|| err(format!("offset out of range: {offset}")))?;

            let present =
                parse_flag(flag).ok_or_else(|| err(format!("invalid presence flag {flag:?}")))?;

            if let Some(prev) = samples.last() {
                if offset < prev.offset {
                    return Err(err("offsets must not decrease".to_string()));
                }
            }

            samples.push(TraceSample { offset, present });
        }

        Ok(Self { samples })
    }
}

fn parse_flag(flag: &str) -> Option<bool> {
    match flag.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Frame image produced by a [`TraceSource`]: just the recorded outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceFrame {
    pub present: bool,
}

/// Replays a [`PresenceTrace`] as a frame source.
#[derive(Debug)]
pub struct TraceSource {
    start: DateTime<Utc>,
    remaining: VecDeque<TraceSample>,
}

impl FrameSource for TraceSource {
    type Image = TraceFrame;

    fn read(&mut self) -> Result<Option<Captured<TraceFrame>>, VisionError> {
        let Some(sample) = self.remaining.pop_front() else {
            return Ok(None);
        };
        let at = self
            .start
            .checked_add_signed(sample.offset)
            .ok_or_else(|| {
                VisionError::FrameRead(format!(
                    "trace offset {}s overflows start time {}",
                    sample.offset.num_seconds(),
                    self.start
                ))
            })?;
        Ok(Some(Captured {
            image: TraceFrame {
                present: sample.present,
            },
            at,
        }))
    }
}

/// Reports the recorded outcome of each trace frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceDetector;

impl PresenceDetector<TraceFrame> for TraceDetector {
    fn detect(&mut self, image: &TraceFrame) -> Result<bool, VisionError> {
        Ok(image.present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;

    #[test]
    fn parses_samples_comments_and_blank_lines() {
        let trace: PresenceTrace = "# offset present\n\
                                    0 1\n\
                                    \n\
                                    1.5 true   # trailing comment\n\
                                    360 no\n"
            .parse()
            .unwrap();

        assert_eq!(
            trace.samples(),
            &[
                TraceSample {
                    offset: Duration::zero(),
                    present: true
                },
                TraceSample {
                    offset: Duration::milliseconds(1500),
                    present: true
                },
                TraceSample {
                    offset: Duration::seconds(360),
                    present: false
                },
            ]
        );
    }

    #[test]
    fn empty_input_is_empty_trace() {
        let trace: PresenceTrace = "# nothing\n\n".parse().unwrap();
        assert!(trace.is_empty());
    }

    #[test]
    fn rejects_bad_lines_with_line_numbers() {
        let cases = [
            ("0 1\nabc 1\n", 2),
            ("0 maybe\n", 1),
            ("0\n", 1),
            ("0 1 extra\n", 1),
            ("-1 1\n", 1),
            ("0 1\n10 1\n5 0\n", 3),
            ("NaN 1\n", 1),
            ("0 1\n10000000000000 0\n", 2),
            ("1e300 1\n", 1),
        ];
        for (input, expected_line) in cases {
            match input.parse::<PresenceTrace>() {
                Err(VisionError::TraceParse { line, .. }) => {
                    assert_eq!(line, expected_line, "input {input:?}");
                }
                other => panic!("expected parse error for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn source_replays_samples_at_offsets() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let trace: PresenceTrace = "0 1\n30 0\n".parse().unwrap();
        let mut source = trace.into_source(start);
        let mut detector = TraceDetector;

        let first = source.read().unwrap().unwrap();
        assert_eq!(first.at, start);
        assert!(detector.detect(&first.image).unwrap());

        let second = source.read().unwrap().unwrap();
        assert_eq!(second.at, start + Duration::seconds(30));
        assert!(!detector.detect(&second.image).unwrap());

        assert!(source.read().unwrap().is_none());
    }

    #[test]
    fn accepts_offsets_up_to_the_limit() {
        let limit = MAX_OFFSET_DAYS * 24 * 60 * 60;
        let trace: PresenceTrace = format!("0 1\n{limit} 0\n").parse().unwrap();
        assert_eq!(trace.samples()[1].offset, Duration::days(MAX_OFFSET_DAYS));

        let over = limit + 1;
        assert!(format!("0 1\n{over} 0\n").parse::<PresenceTrace>().is_err());
    }

    #[test]
    fn source_reports_timestamp_overflow_as_read_error() {
        let start = DateTime::<Utc>::MAX_UTC - Duration::seconds(10);
        let trace: PresenceTrace = "0 1\n60 0\n".parse().unwrap();
        let mut source = trace.into_source(start);

        assert_eq!(source.read().unwrap().unwrap().at, start);
        assert!(matches!(source.read(), Err(VisionError::FrameRead(_))));
        assert!(source.read().unwrap().is_none());
    }

    #[test]
    fn load_reports_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let err = PresenceTrace::load(&temp.path().join("missing.trace")).unwrap_err();
        assert!(matches!(err, VisionError::TraceRead { .. }));
    }

    #[test]
    fn load_reads_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("session.trace");
        std::fs::write(&path, "0 1\n400 0\n").unwrap();

        let trace = PresenceTrace::load(&path).unwrap();
        assert_eq!(trace.len(), 2);
    }
}
