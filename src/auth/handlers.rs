use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tracing::{info, instrument, warn};
use url::form_urlencoded;
use uuid::Uuid;

use crate::{
    auth::dto::{LoginRequest, RegisterRequest},
    error::{AppError, EMAIL_REQUIRED, NOT_REGISTERED},
    extractors::{present, FormOrJson},
    state::AppState,
    store::StoreError,
    views::{AuthTemplate, HtmlTemplate},
};

pub const REGISTERED: &str = "Registered successfully";
pub const ALREADY_REGISTERED: &str = "User already registered";
pub const NO_SUBMISSIONS_YET: &str = "Logged in, no submissions yet. Submit the form first.";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

fn message(message: &'static str) -> HtmlTemplate<AuthTemplate<'static>> {
    HtmlTemplate(AuthTemplate { message })
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    FormOrJson(payload): FormOrJson<RegisterRequest>,
) -> Result<HtmlTemplate<AuthTemplate<'static>>, AppError> {
    let email = present(payload.email.as_deref()).ok_or(AppError::MissingEmail(EMAIL_REQUIRED))?;
    let name = payload.name.as_deref();

    let existing = state
        .store
        .find_user_by_email(email)
        .await
        .map_err(AppError::store("Error registering user"))?;
    if existing.is_some() {
        info!(%email, "email already registered");
        return Ok(message(ALREADY_REGISTERED));
    }

    match state.store.create_user(name, email).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "user registered");
            Ok(message(REGISTERED))
        }
        // A concurrent registration won between the lookup and the insert.
        Err(StoreError::DuplicateEmail) => {
            warn!(%email, "duplicate registration caught by unique index");
            Ok(message(ALREADY_REGISTERED))
        }
        Err(e) => Err(AppError::store("Error registering user")(e)),
    }
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    FormOrJson(payload): FormOrJson<LoginRequest>,
) -> Result<Response, AppError> {
    let email = present(payload.email.as_deref()).ok_or(AppError::MissingEmail(EMAIL_REQUIRED))?;

    let user = state
        .store
        .find_user_by_email(email)
        .await
        .map_err(AppError::store("Error during login"))?;
    let Some(user) = user else {
        info!(%email, "login for unregistered email");
        return Ok(message(NOT_REGISTERED).into_response());
    };

    let latest = state
        .store
        .latest_submission_for(email)
        .await
        .map_err(AppError::store("Error during login"))?;

    match latest {
        Some(submission) => {
            info!(user_id = %user.id, submission_id = %submission.id, "login redirect to latest submission");
            let location = profile_location(submission.id, email);
            Ok((StatusCode::FOUND, [(LOCATION, location)]).into_response())
        }
        None => {
            info!(user_id = %user.id, "login without submissions");
            Ok(message(NO_SUBMISSIONS_YET).into_response())
        }
    }
}

/// `/profile/<id>?email=<email>` with the email form-encoded.
pub(crate) fn profile_location(id: Uuid, email: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("email", email)
        .finish();
    format!("/profile/{id}?{query}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_location_encodes_email() {
        let id = Uuid::nil();
        assert_eq!(
            profile_location(id, "ann+test@x.com"),
            format!("/profile/{id}?email=ann%2Btest%40x.com")
        );
    }
}
