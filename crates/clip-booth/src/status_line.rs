//! Single-line terminal status with state, timer and input level.
//!
//! The line is redrawn in place on stderr whenever any field changes.

use crate::StatusIndicator;

use std::{
    io::{IsTerminal, Write},
    sync::Mutex,
};

use clip_booth_core::{TimerReading, format_clock};
use tracing::{debug, error};

/// Width of the level bar in characters.
pub const LEVEL_BAR_WIDTH: usize = 20;

/// Everything the status line shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Workflow state.
    pub indicator: StatusIndicator,
    /// `MM:SS` timer text.
    pub clock: String,
    /// Input level in percent.
    pub level: u8,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            indicator: StatusIndicator::Ready,
            clock: format_clock(0),
            level: 0,
        }
    }
}

/// Terminal status line shared by the timer and meter tasks.
#[derive(Debug)]
pub struct StatusLine {
    snapshot: Mutex<StatusSnapshot>,
    redraw: bool,
}

impl StatusLine {
    /// Status line that redraws only when stderr is a terminal.
    pub fn new() -> Self {
        Self::with_redraw(std::io::stderr().is_terminal())
    }

    /// Status line with explicit redraw behaviour.
    pub fn with_redraw(redraw: bool) -> Self {
        Self {
            snapshot: Mutex::new(StatusSnapshot::default()),
            redraw,
        }
    }

    /// Switch the indicator. The level drops to zero outside recording.
    pub fn update_state(&self, indicator: StatusIndicator) {
        self.update(|s| {
            s.indicator = indicator;
            if !matches!(
                indicator,
                StatusIndicator::Recording | StatusIndicator::Paused
            ) {
                s.level = 0;
            }
        });
    }

    /// Show a timer reading.
    pub fn update_clock(&self, reading: &TimerReading) {
        self.update(|s| s.clock.clone_from(&reading.display));
    }

    /// Show a meter level.
    pub fn update_level(&self, level: u8) {
        self.update(|s| s.level = level.min(100));
    }

    /// Reset to a fresh idle line.
    pub fn reset(&self) {
        self.update(|s| *s = StatusSnapshot::default());
    }

    /// Current contents.
    pub fn snapshot(&self) -> StatusSnapshot {
        self.lock().clone()
    }

    /// End the in-place line so regular output starts on a fresh row.
    pub fn finish_line(&self) {
        if self.redraw {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr);
        }
    }

    fn update(&self, apply: impl FnOnce(&mut StatusSnapshot)) {
        let line = {
            let mut snapshot = self.lock();
            let before = snapshot.clone();
            apply(&mut snapshot);
            if *snapshot == before {
                return;
            }
            render_line(&snapshot)
        };

        if !self.redraw {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        if let Err(e) = write!(stderr, "\r\x1b[2K{}", line).and_then(|()| stderr.flush()) {
            debug!(error = %e, "Status line redraw failed");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StatusSnapshot> {
        self.snapshot.lock().unwrap_or_else(|e| {
            error!("Status line lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a snapshot as `LABEL    MM:SS [####----------------]  20%`.
pub fn render_line(snapshot: &StatusSnapshot) -> String {
    format!(
        "{:<8} {} [{}] {:>3}%",
        snapshot.indicator.label(),
        snapshot.clock,
        level_bar(snapshot.level, LEVEL_BAR_WIDTH),
        snapshot.level
    )
}

/// Horizontal bar with `level` percent of `width` filled.
pub fn level_bar(level: u8, width: usize) -> String {
    let filled = usize::from(level.min(100)) * width / 100;
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}
