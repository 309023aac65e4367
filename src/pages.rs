use axum::{routing::get, Router};

use crate::{
    state::AppState,
    views::{FormTemplate, HtmlTemplate},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "ok" }))
}

pub async fn index() -> HtmlTemplate<FormTemplate> {
    HtmlTemplate(FormTemplate)
}
