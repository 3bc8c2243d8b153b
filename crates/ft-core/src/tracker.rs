//! Focus session state machine.
//!
//! Turns a per-frame "face present" signal into discrete focus sessions.
//!
//! # States
//!
//! - `Idle`: no face on the previous sample.
//! - `Active`: a session is open since its rising edge.
//!
//! A rising edge opens a session. Further `present` samples only report the
//! elapsed time and never move the start. A falling edge closes the session
//! and runs the duration filter: sessions of at least
//! [`TrackerConfig::min_session`] are added to the cumulative total, shorter
//! ones are discarded.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tracker tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Sessions shorter than this many seconds are discarded.
    /// Default: 300 (5 minutes).
    pub min_session_secs: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            min_session_secs: 300, // 5 minutes
        }
    }
}

impl TrackerConfig {
    /// Creates a config with the given minimum session length.
    pub fn with_min_session(min: Duration) -> Self {
        Self {
            min_session_secs: u64::try_from(min.num_seconds()).unwrap_or(0),
        }
    }

    /// The minimum session length as a duration.
    pub fn min_session(&self) -> Duration {
        i64::try_from(self.min_session_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

/// An open focus session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusSession {
    pub start: DateTime<Utc>,
}

impl FocusSession {
    /// Time since the session started, clamped at zero if the clock went
    /// backwards.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        (now - self.start).max(Duration::zero())
    }
}

/// Coarse tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
}

/// Outcome of feeding one sample to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Nothing to report.
    Idle,
    /// A rising edge opened a session.
    Started { at: DateTime<Utc> },
    /// A session is in progress.
    Elapsed(Duration),
    /// A session closed and passed the duration filter.
    SessionLogged {
        duration: Duration,
        ended_at: DateTime<Utc>,
    },
    /// A session closed but was shorter than the minimum.
    SessionDiscarded {
        duration: Duration,
        ended_at: DateTime<Utc>,
    },
}

/// Tracks focus sessions from a stream of presence samples.
#[derive(Debug, Clone)]
pub struct FocusTracker {
    config: TrackerConfig,
    active: Option<FocusSession>,
    total: Duration,
}

impl FocusTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            active: None,
            total: Duration::zero(),
        }
    }

    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Feeds one presence sample taken at `now`.
    ///
    /// Samples must arrive in temporal order.
    pub fn on_frame(&mut self, present: bool, now: DateTime<Utc>) -> TickResult {
        match (self.active, present) {
            (None, true) => {
                self.active = Some(FocusSession { start: now });
                tracing::debug!(start = %now, "focus session started");
                TickResult::Started { at: now }
            }
            (None, false) => TickResult::Idle,
            (Some(session), true) => TickResult::Elapsed(session.elapsed(now)),
            (Some(session), false) => self.close(session, now),
        }
    }

    /// Closes an open session at shutdown.
    ///
    /// The session is treated as ending at `now` and goes through the same
    /// duration filter as a falling edge. Returns [`TickResult::Idle`] if no
    /// session is open.
    pub fn finalize(&mut self, now: DateTime<Utc>) -> TickResult {
        match self.active {
            Some(session) => {
                tracing::debug!("closing open session at shutdown");
                self.close(session, now)
            }
            None => TickResult::Idle,
        }
    }

    /// Sum of all logged session durations.
    pub const fn total_focused_time(&self) -> Duration {
        self.total
    }

    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub const fn phase(&self) -> Phase {
        if self.active.is_some() {
            Phase::Active
        } else {
            Phase::Idle
        }
    }

    pub const fn active_session(&self) -> Option<&FocusSession> {
        self.active.as_ref()
    }

    /// Elapsed time of the open session, if any.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.active.map(|s| s.elapsed(now))
    }

    fn close(&mut self, session: FocusSession, now: DateTime<Utc>) -> TickResult {
        self.active = None;
        let duration = session.elapsed(now);

        if duration >= self.config.min_session() {
            self.total += duration;
            tracing::debug!(
                duration_secs = duration.num_seconds(),
                total_secs = self.total.num_seconds(),
                "focus session logged"
            );
            TickResult::SessionLogged {
                duration,
                ended_at: now,
            }
        } else {
            tracing::debug!(
                duration_secs = duration.num_seconds(),
                "focus session too short"
            );
            TickResult::SessionDiscarded {
                duration,
                ended_at: now,
            }
        }
    }
}

impl Default for FocusTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
