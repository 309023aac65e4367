mod app;
mod auth;
mod config;
mod db;
mod error;
mod extractors;
mod pages;
mod state;
mod store;
mod submissions;
mod telemetry;
mod views;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init(&config);

    let addr = config.bind_addr();
    let app_state = AppState::init(config).await?;

    app::serve(app::build_app(app_state), &addr).await
}
