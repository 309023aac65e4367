use serde::Deserialize;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for login. Only the email is consulted.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Email field picked out of an arbitrary JSON body by the identity check.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EmailField {
    #[serde(default)]
    pub email: Option<String>,
}
