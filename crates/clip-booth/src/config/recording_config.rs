use crate::config::{default_meter_frame_ms, default_timer_interval_ms};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timer and meter refresh configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Milliseconds between timer readings.
    #[serde(default = "default_timer_interval_ms")]
    pub timer_interval_ms: u64,

    /// Milliseconds between level meter samples.
    #[serde(default = "default_meter_frame_ms")]
    pub meter_frame_ms: u64,
}

impl RecordingConfig {
    /// Timer period, never shorter than one millisecond.
    pub fn timer_interval(&self) -> Duration {
        Duration::from_millis(self.timer_interval_ms.max(1))
    }

    /// Meter period, never shorter than one millisecond.
    pub fn meter_frame(&self) -> Duration {
        Duration::from_millis(self.meter_frame_ms.max(1))
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            timer_interval_ms: default_timer_interval_ms(),
            meter_frame_ms: default_meter_frame_ms(),
        }
    }
}
