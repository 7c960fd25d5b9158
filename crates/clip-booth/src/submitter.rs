//! Multipart client for the recordings endpoint.

use crate::{AppError, AppResult, config::SubmissionConfig};

use std::panic::Location;

use clip_booth_core::{ATTACHMENT_NAME, EncodedSubmission, WAV_MIME_TYPE};
use error_location::ErrorLocation;
use reqwest::{
    Client, StatusCode,
    multipart::{Form, Part},
};
use serde::Deserialize;
use tracing::{info, instrument, warn};

/// Multipart field carrying the audio attachment.
pub const MEDIA_FIELD: &str = "media";

/// Endpoint reply.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Sends rendered submissions to the recordings endpoint.
///
/// One attempt per call. There is no retry.
#[derive(Debug, Clone)]
pub struct Submitter {
    client: Client,
    endpoint: String,
    max_upload_bytes: u64,
}

impl Submitter {
    /// Client for the configured endpoint.
    #[track_caller]
    pub fn new(config: &SubmissionConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to build HTTP client: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint_url(),
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    /// Endpoint this client posts to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post `submission` and return the id the endpoint assigned, if any.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionFailed` if the attachment exceeds the upload limit,
    /// the request fails, or the endpoint does not reply `{ "ok": true }`.
    #[instrument(skip(self, submission), fields(
        endpoint = %self.endpoint,
        bytes = submission.audio.len(),
        duration_ms = submission.duration_ms,
        source = submission.source.as_str(),
    ))]
    pub async fn submit(&self, submission: &EncodedSubmission) -> AppResult<Option<String>> {
        let location = Location::caller();

        check_upload_size(submission.audio.len(), self.max_upload_bytes)?;

        let form = build_form(submission)?;

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::SubmissionFailed {
                reason: format!("Request failed: {}", e),
                location: ErrorLocation::from(location),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::SubmissionFailed {
                reason: format!("Failed to read response: {}", e),
                location: ErrorLocation::from(location),
            })?;

        let id = interpret_response(status, &body)?;

        info!(id = ?id, "Submission accepted");

        Ok(id)
    }
}

/// Reject attachments the endpoint would refuse.
#[track_caller]
pub fn check_upload_size(len: usize, max_upload_bytes: u64) -> AppResult<()> {
    if len as u64 > max_upload_bytes {
        return Err(AppError::SubmissionFailed {
            reason: format!(
                "Recording is {} bytes, above the {} byte upload limit",
                len, max_upload_bytes
            ),
            location: ErrorLocation::from(Location::caller()),
        });
    }
    Ok(())
}

/// Multipart body: the WAV attachment followed by the text fields.
#[track_caller]
pub fn build_form(submission: &EncodedSubmission) -> AppResult<Form> {
    let media = Part::bytes(submission.audio.clone())
        .file_name(ATTACHMENT_NAME)
        .mime_str(WAV_MIME_TYPE)
        .map_err(|e| AppError::SubmissionFailed {
            reason: format!("Invalid attachment type: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let form = submission
        .form_fields()
        .into_iter()
        .fold(Form::new().part(MEDIA_FIELD, media), |form, (name, value)| {
            form.text(name, value)
        });

    Ok(form)
}

/// Map the endpoint's reply to the assigned id or `SubmissionFailed`.
///
/// `ok: true` is the only success signal; the id is reported when present.
#[track_caller]
pub fn interpret_response(status: StatusCode, body: &str) -> AppResult<Option<String>> {
    let location = Location::caller();
    let failed = |reason: String| AppError::SubmissionFailed {
        reason,
        location: ErrorLocation::from(location),
    };

    let parsed = serde_json::from_str::<SubmitResponse>(body);

    if !status.is_success() {
        let detail = parsed
            .ok()
            .and_then(|r| r.error)
            .unwrap_or_else(|| body.trim().to_string());
        warn!(status = %status, detail = %detail, "Endpoint rejected submission");
        return Err(failed(format!("HTTP {}: {}", status, detail)));
    }

    let reply = parsed.map_err(|e| failed(format!("Unparsable response: {}", e)))?;

    if reply.ok {
        return Ok(reply.id);
    }
    Err(failed(reply.error.unwrap_or_else(|| {
        "Endpoint did not confirm the submission".to_string()
    })))
}
