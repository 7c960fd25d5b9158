use serde::{Deserialize, Serialize};

/// Default submitter identity, overridable per run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitterConfig {
    /// Name used when `--name` is not given.
    #[serde(default)]
    pub full_name: Option<String>,

    /// Email used when `--email` is not given.
    #[serde(default)]
    pub email: Option<String>,
}
