//! Elapsed recording time, excluding pauses.

use crate::capture::{RecordingSession, SessionState};

use std::time::Duration;

/// Default spacing between timer readings.
pub const TIMER_INTERVAL: Duration = Duration::from_millis(250);

/// One published timer value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerReading {
    /// Recorded milliseconds at the time of the reading.
    pub elapsed_ms: u64,
    /// `MM:SS` rendering of `elapsed_ms`.
    pub display: String,
}

impl TimerReading {
    fn new(elapsed_ms: u64) -> Self {
        Self {
            elapsed_ms,
            display: format_clock(elapsed_ms),
        }
    }
}

/// Render milliseconds as `MM:SS`.
///
/// Both fields are zero-padded to two digits; minutes are not wrapped.
pub fn format_clock(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Publishes readings while a session records and keeps the last one.
#[derive(Debug, Default)]
pub struct RecordingTimer {
    last: Option<TimerReading>,
    frozen: bool,
}

impl RecordingTimer {
    /// Idle timer with nothing published.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the published value and start accepting ticks.
    pub fn reset(&mut self) {
        self.last = None;
        self.frozen = false;
    }

    /// Publish a reading if the session is recording.
    pub fn tick(&mut self, session: &RecordingSession, now_ms: u64) -> Option<&TimerReading> {
        if self.frozen || session.state() != SessionState::Recording {
            return None;
        }
        self.last = Some(TimerReading::new(session.elapsed_ms(now_ms)));
        self.last.as_ref()
    }

    /// Publish a closing reading and ignore ticks until the next reset.
    pub fn freeze(&mut self, session: &RecordingSession, now_ms: u64) -> &TimerReading {
        self.frozen = true;
        self.last
            .insert(TimerReading::new(session.elapsed_ms(now_ms)))
    }

    /// Last published reading.
    pub fn last(&self) -> Option<&TimerReading> {
        self.last.as_ref()
    }
}
