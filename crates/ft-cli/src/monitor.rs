//! The frame loop that connects a frame source to the focus tracker.
//!
//! One iteration reads one frame. Every Nth frame (see [`FrameSkip`]) goes
//! through the detector and feeds the tracker. Every frame is rendered with
//! the current overlay. The loop ends on end of stream, a failed read, or a
//! cancel request from the display. On any of these the open session is
//! flushed and the cumulative total is reported before returning. A detector
//! or display error aborts the run instead, leaving the open session unlogged.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use ft_core::{FocusTracker, LogRecord, TickResult, format_duration};
use ft_log::{FocusLog, local_time};
use ft_vision::{DisplaySink, FrameSkip, FrameSource, Overlay, PresenceDetector};

/// Why the frame loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    EndOfStream,
    Cancelled,
    ReadFailed,
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorOutcome {
    pub end: EndReason,
    pub frames: u64,
    pub samples: u64,
    pub sessions_logged: u32,
    pub total: chrono::Duration,
    pub total_logged: bool,
}

/// Owns the tracker and the log for the lifetime of one run.
pub struct Monitor<W> {
    tracker: FocusTracker,
    log: FocusLog,
    skip: FrameSkip,
    out: W,
    sessions_logged: u32,
}

impl<W: Write> Monitor<W> {
    pub fn new(tracker: FocusTracker, log: FocusLog, skip: FrameSkip, out: W) -> Self {
        Self {
            tracker,
            log,
            skip,
            out,
            sessions_logged: 0,
        }
    }

    /// Runs the loop to completion. The log is closed when this returns.
    pub fn run<S, D, K>(
        mut self,
        source: &mut S,
        detector: &mut D,
        display: &mut K,
    ) -> Result<MonitorOutcome>
    where
        S: FrameSource,
        D: PresenceDetector<S::Image>,
        K: DisplaySink<S::Image>,
    {
        writeln!(self.out, "Starting Focus Tracker...")?;
        tracing::info!(
            min_session_secs = self.tracker.config().min_session_secs,
            stride = self.skip.stride(),
            log = %self.log.path().display(),
            "monitor started"
        );

        let mut frames = 0u64;
        let mut samples = 0u64;
        let mut last_at: Option<DateTime<Utc>> = None;

        let end = loop {
            let mut captured = match source.read() {
                Ok(Some(captured)) => captured,
                Ok(None) => break EndReason::EndOfStream,
                Err(e) => {
                    tracing::warn!(error = %e, "frame read failed, stopping");
                    writeln!(self.out, "Cannot read frame")?;
                    break EndReason::ReadFailed;
                }
            };
            frames += 1;
            last_at = Some(captured.at);

            if self.skip.advance() {
                let present = detector
                    .detect(&captured.image)
                    .context("face detection failed")?;
                samples += 1;
                let tick = self.tracker.on_frame(present, captured.at);
                self.handle_tick(tick)?;
            }

            let overlay = Overlay {
                current: self.tracker.elapsed(captured.at),
                total: self.tracker.total_focused_time(),
            };
            display
                .render(&mut captured.image, &overlay)
                .context("failed to render frame")?;

            if display.poll_cancel().context("failed to poll display")? {
                break EndReason::Cancelled;
            }
        };

        let finished_at = last_at.unwrap_or_else(Utc::now);
        let tick = self.tracker.finalize(finished_at);
        self.handle_tick(tick)?;
        let total_logged = self.report_total(finished_at)?;

        tracing::info!(?end, frames, samples, "monitor stopped");
        Ok(MonitorOutcome {
            end,
            frames,
            samples,
            sessions_logged: self.sessions_logged,
            total: self.tracker.total_focused_time(),
            total_logged,
        })
    }

    fn handle_tick(&mut self, tick: TickResult) -> Result<()> {
        match tick {
            TickResult::Idle | TickResult::Elapsed(_) => {}
            TickResult::Started { .. } => {
                writeln!(self.out, "Focus started.")?;
            }
            TickResult::SessionLogged { duration, ended_at } => {
                self.log
                    .append(&LogRecord::session(local_time(ended_at), duration))?;
                self.sessions_logged += 1;
                writeln!(self.out, "Session logged: {}", format_duration(duration))?;
            }
            TickResult::SessionDiscarded { duration, .. } => {
                tracing::debug!(duration_secs = duration.num_seconds(), "session discarded");
                writeln!(self.out, "Session too short. Not logged.")?;
            }
        }
        Ok(())
    }

    /// Writes the shutdown total if it reaches the minimum session length.
    fn report_total(&mut self, at: DateTime<Utc>) -> Result<bool> {
        let total = self.tracker.total_focused_time();
        if total >= self.tracker.config().min_session() {
            self.log.append(&LogRecord::total(local_time(at), total))?;
            writeln!(self.out, "Total session logged: {}", format_duration(total))?;
            Ok(true)
        } else {
            writeln!(self.out, "Total session too short. Not logged.")?;
            Ok(false)
        }
    }
}
