//! Input level metering for display.
//!
//! Purely observational: nothing here touches capture state, and a missing
//! or silent signal reads as 0%.

use crate::capture::{SignalTap, TAP_WINDOW};

/// Peak deviation of a float frame as a percentage of full scale.
///
/// Center is 0.0 and full scale is 1.0. Non-finite samples count as silence.
pub fn peak_percent(frame: &[f32]) -> u8 {
    let peak = frame
        .iter()
        .filter(|s| s.is_finite())
        .fold(0.0f32, |peak, s| peak.max(s.abs()));
    ((peak * 100.0).floor() as u32).min(100) as u8
}

/// Reads a [`SignalTap`] once per display frame.
#[derive(Debug)]
pub struct LevelMeter {
    scratch: Vec<f32>,
}

impl LevelMeter {
    /// Meter with a scratch frame sized for the tap window.
    pub fn new() -> Self {
        Self {
            scratch: Vec::with_capacity(TAP_WINDOW),
        }
    }

    /// Current level, or `None` once the tap has been closed.
    pub fn sample(&mut self, tap: &SignalTap) -> Option<u8> {
        if !tap.read_into(&mut self.scratch) {
            return None;
        }
        Some(peak_percent(&self.scratch))
    }
}

impl Default for LevelMeter {
    fn default() -> Self {
        Self::new()
    }
}
