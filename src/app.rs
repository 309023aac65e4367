use axum::Router;
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::state::AppState;
use crate::{auth, pages, submissions, telemetry};

/// Each action has one handler; `/auth` and `/submissions` mount the same
/// routers again under their prefixes.
pub fn build_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .merge(pages::router())
        .merge(auth::router())
        .nest("/auth", auth::router())
        .merge(submissions::router(&state))
        .nest("/submissions", submissions::router(&state))
        .fallback_service(static_files)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(telemetry::http_trace_layer())
}

pub async fn serve(app: Router, addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
