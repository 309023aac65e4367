use serde::Deserialize;

use super::repo_types::NewSubmission;

/// Submit form body. Every field is optional; only the email is trimmed so
/// login can find it under the same key register stored.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<SubmitRequest> for NewSubmission {
    fn from(r: SubmitRequest) -> Self {
        Self {
            name: r.name,
            email: r.email.map(|e| e.trim().to_owned()),
            message: r.message,
        }
    }
}
