//! Payload handed to the submission endpoint.

use crate::{BoothError, CoreResult};

use std::panic::Location;

use error_location::ErrorLocation;

/// Attachment file name expected by the endpoint.
pub const ATTACHMENT_NAME: &str = "recording.wav";

/// Where a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionSource {
    /// Captured and trimmed by the recorder.
    Record,
    /// An existing file uploaded as-is.
    Upload,
}

impl SubmissionSource {
    /// Tag sent in the `source` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionSource::Record => "record",
            SubmissionSource::Upload => "upload",
        }
    }
}

/// Submitter-entered metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionForm {
    /// Submitter's full name. Required.
    pub full_name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Clip title. Required.
    pub title: String,
    /// Library category. Required.
    pub category: String,
    /// Free-form description.
    pub description: Option<String>,
}

impl SubmissionForm {
    /// Check the fields the endpoint rejects when blank.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` naming the first blank required field.
    #[track_caller]
    pub fn validate(&self) -> CoreResult<()> {
        let required = [
            ("fullName", &self.full_name),
            ("title", &self.title),
            ("category", &self.category),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(BoothError::MissingField {
                    field,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        }
        Ok(())
    }
}

/// Encoded audio plus everything the endpoint needs alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSubmission {
    /// Complete PCM16 WAV file.
    pub audio: Vec<u8>,
    /// Submitter metadata.
    pub form: SubmissionForm,
    /// Duration of the encoded audio in whole milliseconds.
    pub duration_ms: u64,
    /// Origin tag.
    pub source: SubmissionSource,
    /// Frames in the encoded audio.
    pub frames: usize,
    /// Sample rate of the encoded audio.
    pub sample_rate: u32,
    /// Channel count of the encoded audio.
    pub channels: usize,
}

impl EncodedSubmission {
    /// Text form fields in endpoint naming. Absent optional fields are omitted.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("fullName", self.form.full_name.clone()),
            ("title", self.form.title.clone()),
            ("category", self.form.category.clone()),
        ];
        if let Some(email) = self.form.email.as_ref().filter(|e| !e.trim().is_empty()) {
            fields.push(("email", email.clone()));
        }
        if let Some(description) = self.form.description.as_ref().filter(|d| !d.trim().is_empty())
        {
            fields.push(("description", description.clone()));
        }
        fields.push(("durationMs", self.duration_ms.to_string()));
        fields.push(("source", self.source.as_str().to_string()));
        fields
    }
}
