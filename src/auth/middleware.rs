use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header::CONTENT_TYPE, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};
use url::form_urlencoded;

use super::{dto::EmailField, repo_types::User};
use crate::{
    error::{AppError, EMAIL_REQUIRED_FOR_ACTION},
    extractors::{is_json, present},
    state::AppState,
};

/// Bodies larger than this are rejected before the email lookup.
const BODY_LIMIT: usize = 64 * 1024;

/// The user whose email passed the identity check.
#[derive(Debug, Clone)]
pub struct RegisteredUser(pub User);

/// Lets the request through only when its email belongs to a registered user.
///
/// The email is read from the body first (JSON or url-encoded, by content
/// type) and then from the `email` query parameter. This is an existence
/// check: anyone who knows a registered email passes it.
pub async fn require_registered(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, BODY_LIMIT)
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read request body: {e}")))?;

    let email = email_from_body(&parts.headers, &bytes)
        .or_else(|| email_from_query(parts.uri.query()))
        .ok_or(AppError::MissingEmail(EMAIL_REQUIRED_FOR_ACTION))?;

    let user = state
        .store
        .find_user_by_email(&email)
        .await
        .map_err(AppError::store("Server error"))?
        .ok_or_else(|| {
            warn!(%email, path = %parts.uri.path(), "identity check rejected unknown email");
            AppError::NotRegistered
        })?;

    debug!(user_id = %user.id, %email, "identity check passed");
    let mut req = Request::from_parts(parts, Body::from(bytes));
    req.extensions_mut().insert(RegisteredUser(user));
    Ok(next.run(req).await)
}

fn email_from_body(headers: &HeaderMap, bytes: &Bytes) -> Option<String> {
    if bytes.is_empty() {
        return None;
    }
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    if is_json(content_type) {
        let field: EmailField = serde_json::from_slice(bytes).unwrap_or_default();
        present(field.email.as_deref()).map(str::to_owned)
    } else {
        email_from_pairs(bytes)
    }
}

fn email_from_query(query: Option<&str>) -> Option<String> {
    email_from_pairs(query?.as_bytes())
}

fn email_from_pairs(input: &[u8]) -> Option<String> {
    form_urlencoded::parse(input)
        .find(|(key, _)| key == "email")
        .and_then(|(_, value)| present(Some(value.as_ref())).map(str::to_owned))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn reads_email_from_json_body() {
        let body = Bytes::from_static(br#"{"email":"ann@x.com","message":"hi"}"#);
        assert_eq!(
            email_from_body(&headers("application/json"), &body).as_deref(),
            Some("ann@x.com")
        );
    }

    #[test]
    fn reads_email_from_form_body() {
        let body = Bytes::from_static(b"name=Ann&email=ann%40x.com");
        assert_eq!(
            email_from_body(&headers("application/x-www-form-urlencoded"), &body).as_deref(),
            Some("ann@x.com")
        );
    }

    #[test]
    fn malformed_json_yields_no_email() {
        let body = Bytes::from_static(br#"{"email": 42}"#);
        assert_eq!(email_from_body(&headers("application/json"), &body), None);
    }

    #[test]
    fn reads_email_from_query() {
        assert_eq!(
            email_from_query(Some("email=ann%40x.com&x=1")).as_deref(),
            Some("ann@x.com")
        );
        assert_eq!(email_from_query(Some("email=")), None);
        assert_eq!(email_from_query(None), None);
    }
}
