//! Upload diagnostics.

use serde::{Deserialize, Serialize};

const fn default_body_snippet_chars() -> usize {
    400
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadConfig {
    /// How much of a non-JSON response body to keep in the error message.
    #[serde(default = "default_body_snippet_chars")]
    pub body_snippet_chars: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            body_snippet_chars: default_body_snippet_chars(),
        }
    }
}
