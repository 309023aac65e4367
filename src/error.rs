use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use askama::Template;
use thiserror::Error;
use tracing::error;

use crate::{store::StoreError, views::AuthTemplate};

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_REQUIRED_FOR_ACTION: &str = "Email is required for this action";
pub const NOT_REGISTERED: &str = "User has not registered";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    MissingEmail(&'static str),

    #[error("User has not registered")]
    NotRegistered,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    Store {
        message: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Error rendering page")]
    Template(#[from] askama::Error),
}

impl AppError {
    /// Adapter for `map_err`: wraps a store failure behind a caller-facing message.
    pub fn store(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Store { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingEmail(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotRegistered => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store { .. } | AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::MissingEmail(message) => auth_page(status, message),
            AppError::NotRegistered => auth_page(status, NOT_REGISTERED),
            AppError::Store { message, source } => {
                error!(error = %source, "{message}");
                (status, *message).into_response()
            }
            AppError::Template(e) => {
                error!(error = %e, "template render failed");
                (status, self.to_string()).into_response()
            }
            AppError::NotFound | AppError::BadRequest(_) => (status, self.to_string()).into_response(),
        }
    }
}

// Rendered directly so a broken auth template cannot recurse back into AppError.
fn auth_page(status: StatusCode, message: &str) -> Response {
    match (AuthTemplate { message }).render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            error!(error = %e, "auth template render failed");
            (status, message.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_text(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn store_failures_hide_the_cause() {
        let err = AppError::store("Error saving submission")(StoreError::Database(
            sqlx::Error::Protocol("password authentication failed for user admin".into()),
        ));
        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(res).await;
        assert_eq!(body, "Error saving submission");
    }

    #[tokio::test]
    async fn identity_failures_render_the_auth_view() {
        let res = AppError::NotRegistered.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = body_text(res).await;
        assert!(body.contains("<html"));
        assert!(body.contains(NOT_REGISTERED));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(AppError::MissingEmail(EMAIL_REQUIRED).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::BadRequest("bad".into()).status(), StatusCode::BAD_REQUEST);
    }
}
