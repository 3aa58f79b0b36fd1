//! Elapsed-time tracking for the active exercise.
//!
//! Two values are kept apart:
//! - the display counter, bumped once per foreground tick and corrected in a
//!   single step when the host resumes after being suspended
//! - the committed duration, always derived from wall-clock start and stop
//!
//! The display counter never feeds calorie calculation.

use crate::{Error, Result};
use chrono::{DateTime, Utc};

/// Whole seconds from `from` to `to`, floored; zero if `to` is earlier
pub fn seconds_between_floor(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    (to - from).num_seconds().max(0) as u64
}

/// Committed duration of a timed set: round((stop − start) / 1000 ms)
pub fn wall_clock_duration(start: DateTime<Utc>, stop: DateTime<Utc>) -> u32 {
    let millis = (stop - start).num_milliseconds().max(0);
    (millis as f64 / 1000.0).round() as u32
}

/// Clock for the single exercise being timed
#[derive(Clone, Debug, Default)]
pub struct SessionClock {
    started_at: Option<DateTime<Utc>>,
    suspended_at: Option<DateTime<Utc>>,
    display_seconds: u64,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended_at.is_some()
    }

    /// Value shown to the user; cosmetic only
    pub fn display_seconds(&self) -> u64 {
        self.display_seconds
    }

    /// Start timing; only one clock runs at a time
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.is_running() {
            return Err(Error::Precondition("session clock is already running".into()));
        }
        self.started_at = Some(now);
        self.suspended_at = None;
        self.display_seconds = 0;
        tracing::debug!("Session clock started at {}", now);
        Ok(())
    }

    /// Foreground timer callback. No-op while stopped or suspended.
    pub fn tick(&mut self) -> u64 {
        if self.is_running() && !self.is_suspended() {
            self.display_seconds += 1;
        }
        self.display_seconds
    }

    /// Host went to the background
    pub fn suspend(&mut self, now: DateTime<Utc>) {
        if !self.is_running() || self.is_suspended() {
            return;
        }
        self.suspended_at = Some(now);
        tracing::debug!("Session clock suspended at {}", now);
    }

    /// Host came back; returns the seconds added to the display counter
    ///
    /// Calling this again without an intervening suspend adds nothing.
    pub fn resume(&mut self, now: DateTime<Utc>) -> u64 {
        let Some(suspended_at) = self.suspended_at.take() else {
            return 0;
        };
        if !self.is_running() {
            return 0;
        }
        let missed = seconds_between_floor(suspended_at, now);
        self.display_seconds += missed;
        tracing::debug!("Session clock resumed, reconciled {}s", missed);
        missed
    }

    /// Stop timing and return the wall-clock duration in seconds
    pub fn stop(&mut self, now: DateTime<Utc>) -> Result<u32> {
        let started_at = self
            .started_at
            .ok_or_else(|| Error::Precondition("session clock is not running".into()))?;
        let duration = wall_clock_duration(started_at, now);
        self.reset();
        tracing::debug!("Session clock stopped after {}s", duration);
        Ok(duration)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
