//! Replay a recorded presence trace through the monitor.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use ft_core::FocusTracker;
use ft_log::FocusLog;
use ft_vision::{FrameSkip, Headless, PresenceTrace, TraceDetector};

use crate::Config;
use crate::monitor::{Monitor, MonitorOutcome};

/// Feeds every trace sample to the tracker, writing to the configured log.
///
/// Trace offsets are anchored at `start`, so log timestamps reflect the
/// replayed timeline rather than the time of the replay.
pub fn run<W: Write>(
    out: W,
    config: &Config,
    trace_path: &Path,
    start: DateTime<Utc>,
) -> Result<MonitorOutcome> {
    let trace = PresenceTrace::load(trace_path)
        .with_context(|| format!("failed to load trace {}", trace_path.display()))?;
    let log = FocusLog::open(&config.log_path)?;

    let mut source = trace.into_source(start);
    Monitor::new(
        FocusTracker::new(config.tracker),
        log,
        FrameSkip::default(),
        out,
    )
    .run(&mut source, &mut TraceDetector, &mut Headless)
}
