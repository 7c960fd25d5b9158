use std::path::PathBuf;

use clip_booth_core::SubmissionForm;

/// Commands sent from the console handler to the main application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Acquire the microphone and begin a new recording.
    Start,
    /// Pause the running recording.
    Pause,
    /// Resume a paused recording.
    Resume,
    /// Stop and finalize the recording.
    Stop,
    /// Discard the finalized recording.
    ReRecord,
    /// Select the part of the recording to submit.
    Trim {
        /// Start position in whole percent.
        start_percent: u8,
        /// End position in whole percent.
        end_percent: u8,
    },
    /// Set one submission metadata field for the next submit.
    SetField {
        /// Field to change.
        field: FormField,
        /// New value. Blank clears optional fields.
        value: String,
    },
    /// Render the trimmed recording and send it to the endpoint.
    Submit,
    /// Render an existing audio file and send it as an upload.
    Upload {
        /// File to upload.
        path: PathBuf,
    },
    /// Print the current state, timer and trim.
    Status,
    /// Print the command reference.
    Help,
    /// Request application shutdown.
    Shutdown,
}

/// Submission metadata settable from the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Submitter's full name.
    Name,
    /// Contact email.
    Email,
    /// Clip title.
    Title,
    /// Library category.
    Category,
    /// Free-form description.
    Description,
}

impl FormField {
    /// Console verb for this field.
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Title => "title",
            FormField::Category => "category",
            FormField::Description => "description",
        }
    }

    /// Store `value` in `form`, trimmed. Blank optional fields become `None`.
    pub fn apply(&self, form: &mut SubmissionForm, value: &str) {
        let value = value.trim();
        let optional = (!value.is_empty()).then(|| value.to_string());
        match self {
            FormField::Name => form.full_name = value.to_string(),
            FormField::Email => form.email = optional,
            FormField::Title => form.title = value.to_string(),
            FormField::Category => form.category = value.to_string(),
            FormField::Description => form.description = optional,
        }
    }
}

/// Drop the per-clip fields once a clip has been submitted.
///
/// Identity and category carry over to the next clip.
pub fn clear_clip_details(form: &mut SubmissionForm) {
    form.title.clear();
    form.description = None;
}
