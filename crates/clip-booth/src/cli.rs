use crate::config::SubmitterConfig;

use clap::Parser;
use clip_booth_core::SubmissionForm;

/// Record, trim and submit audio clips from the terminal.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Record, trim and submit audio clips")]
pub struct Cli {
    /// Submitter's full name (falls back to the config file)
    #[arg(long)]
    pub name: Option<String>,

    /// Contact email (falls back to the config file)
    #[arg(long)]
    pub email: Option<String>,

    /// Clip title
    #[arg(long)]
    pub title: Option<String>,

    /// Library category
    #[arg(long)]
    pub category: Option<String>,

    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,

    /// Override the configured site root
    #[arg(long)]
    pub base_url: Option<String>,
}

impl Cli {
    /// Submission metadata from flags, with config defaults for identity.
    ///
    /// Blank required fields are left blank; the renderer reports them.
    pub fn submission_form(&self, defaults: &SubmitterConfig) -> SubmissionForm {
        SubmissionForm {
            full_name: self
                .name
                .clone()
                .or_else(|| defaults.full_name.clone())
                .unwrap_or_default(),
            email: self.email.clone().or_else(|| defaults.email.clone()),
            title: self.title.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
            description: self.description.clone(),
        }
    }
}
