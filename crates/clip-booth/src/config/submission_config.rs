use crate::config::{
    default_base_url, default_endpoint_path, default_library_path, default_max_upload_bytes,
    default_timeout_secs,
};

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Submission endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Site root, e.g. `http://localhost:3000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the multipart recordings endpoint.
    #[serde(default = "default_endpoint_path")]
    pub endpoint_path: String,

    /// Path of the public library page shown after submitting.
    #[serde(default = "default_library_path")]
    pub library_path: String,

    /// Whole-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Largest attachment the endpoint accepts.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl SubmissionConfig {
    /// Absolute URL of the recordings endpoint.
    pub fn endpoint_url(&self) -> String {
        join_url(&self.base_url, &self.endpoint_path)
    }

    /// Absolute URL of the library page.
    pub fn library_url(&self) -> String {
        join_url(&self.base_url, &self.library_path)
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint_path: default_endpoint_path(),
            library_path: default_library_path(),
            timeout_secs: default_timeout_secs(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
