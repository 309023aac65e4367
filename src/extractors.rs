use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Body extractor accepting either a JSON object or a url-encoded form,
/// chosen by `Content-Type`.
pub struct FormOrJson<T>(pub T);

pub(crate) fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|mime| {
            let mime = mime.trim();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

#[async_trait]
impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());

        if is_json(content_type) {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|r| AppError::BadRequest(r.body_text()))?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|r| AppError::BadRequest(r.body_text()))?;
            Ok(Self(value))
        }
    }
}

/// Trim a submitted email; blank counts as absent.
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_detection_ignores_parameters() {
        assert!(is_json(Some("application/json")));
        assert!(is_json(Some("application/json; charset=utf-8")));
        assert!(is_json(Some("application/merge-patch+json")));
        assert!(!is_json(Some("application/x-www-form-urlencoded")));
        assert!(!is_json(None));
    }

    #[test]
    fn blank_values_are_absent() {
        assert_eq!(present(Some("  ann@x.com ")), Some("ann@x.com"));
        assert_eq!(present(Some("   ")), None);
        assert_eq!(present(Some("")), None);
        assert_eq!(present(None), None);
    }
}
