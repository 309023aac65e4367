mod dto;
pub mod handlers;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub fn router(state: &AppState) -> Router<AppState> {
    handlers::submission_routes(state)
}
