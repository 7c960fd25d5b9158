#[allow(clippy::module_inception)]
mod config;
mod recording_config;
mod submission_config;
mod submitter_config;

use clip_booth_core::TIMER_INTERVAL;

pub(crate) use {
    config::Config, recording_config::RecordingConfig, submission_config::SubmissionConfig,
    submitter_config::SubmitterConfig,
};

pub(crate) const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub(crate) const DEFAULT_ENDPOINT_PATH: &str = "/api/recordings";
pub(crate) const DEFAULT_LIBRARY_PATH: &str = "/library";
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub(crate) const DEFAULT_MAX_UPLOAD_BYTES: u64 = 200 * 1024 * 1024;
pub(crate) const DEFAULT_TIMER_INTERVAL_MS: u64 = TIMER_INTERVAL.as_millis() as u64;
pub(crate) const DEFAULT_METER_FRAME_MS: u64 = 16;

pub(crate) fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub(crate) fn default_endpoint_path() -> String {
    DEFAULT_ENDPOINT_PATH.to_string()
}

pub(crate) fn default_library_path() -> String {
    DEFAULT_LIBRARY_PATH.to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub(crate) fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

pub(crate) fn default_timer_interval_ms() -> u64 {
    DEFAULT_TIMER_INTERVAL_MS
}

pub(crate) fn default_meter_frame_ms() -> u64 {
    DEFAULT_METER_FRAME_MS
}
