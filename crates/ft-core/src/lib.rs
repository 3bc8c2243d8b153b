//! Core domain logic for the focus tracker.
//!
//! This crate contains:
//! - Tracker: the focus session state machine and its duration filter
//! - Duration strings: the `HHh:MMm:SSs` format used in the focus log
//! - Records: rendering and parsing of focus log lines

pub mod duration;
pub mod record;
pub mod tracker;

pub use duration::{DurationParseError, format_duration, parse_duration};
pub use record::{LogRecord, RecordKind, RecordParseError, TIMESTAMP_FORMAT};
pub use tracker::{FocusSession, FocusTracker, Phase, TickResult, TrackerConfig};
