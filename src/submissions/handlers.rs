use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::SubmitRequest;
use crate::{
    auth::middleware::{require_registered, RegisteredUser},
    error::AppError,
    extractors::FormOrJson,
    state::AppState,
    views::{HtmlTemplate, ListTemplate, ProfileTemplate, ResultTemplate, SubmissionView},
};

/// Every profile route goes through the identity check.
pub fn submission_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/submit", post(submit))
        .route(
            "/profile/:id",
            get(profile).route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_registered,
            )),
        )
        .route("/list", get(list))
}

#[instrument(skip(state, payload))]
pub async fn submit(
    State(state): State<AppState>,
    FormOrJson(payload): FormOrJson<SubmitRequest>,
) -> Result<HtmlTemplate<ResultTemplate>, AppError> {
    let submission = state
        .store
        .create_submission(payload.into())
        .await
        .map_err(AppError::store("Error saving submission"))?;

    info!(submission_id = %submission.id, "submission saved");
    Ok(HtmlTemplate(ResultTemplate {
        submission: submission.into(),
    }))
}

#[instrument(skip(state, viewer))]
pub async fn profile(
    State(state): State<AppState>,
    Extension(RegisteredUser(viewer)): Extension<RegisteredUser>,
    Path(id): Path<String>,
) -> Result<HtmlTemplate<ProfileTemplate>, AppError> {
    // A malformed id cannot name a stored submission.
    let id = Uuid::parse_str(&id).map_err(|_| AppError::NotFound)?;

    let submission = state
        .store
        .find_submission(id)
        .await
        .map_err(AppError::store("Error fetching submission"))?
        .ok_or(AppError::NotFound)?;

    info!(viewer_id = %viewer.id, submission_id = %submission.id, "profile viewed");
    Ok(HtmlTemplate(ProfileTemplate {
        submission: submission.into(),
    }))
}

#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<HtmlTemplate<ListTemplate>, AppError> {
    let submissions = state
        .store
        .list_submissions()
        .await
        .map_err(AppError::store("Error fetching submissions"))?;

    Ok(HtmlTemplate(ListTemplate {
        submissions: submissions.into_iter().map(SubmissionView::from).collect(),
    }))
}
