use crate::app_env::AppConfig;
use anyhow::Context;
use axum::extract::State;
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

mod api;
mod app_env;
mod db;
mod domain;
mod dto;
mod external_connections;
mod logging;
mod persistence;
mod routes;
mod routing_utils;


/// Data every request handler has access to
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

/// Extractor for [SharedData] in request handlers
pub type AppState = State<Arc<SharedData>>;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    if dotenv().is_err() {
        println!("No .env file found, reading configuration from the environment only.");
    }

    let config = AppConfig::from_env()?;
    let otel_exporters = config
        .otel
        .as_ref()
        .map(logging::init_exporters)
        .transpose()?;
    logging::setup_logging_and_tracing(logging::init_env_filter()?, otel_exporters);

    let pool = db::connect_sqlx(&config.db_url)
        .await
        .context("connecting to the database")?;
    db::run_migrations(&pool)
        .await
        .context("applying database migrations")?;

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(pool),
    });
    let router = api::build_router(shared_data);

    let listener = TcpListener::bind(&config.listen_address)
        .await
        .with_context(|| format!("binding to {}", config.listen_address))?;
    info!(address = %config.listen_address, "Starting server");
    axum::serve(listener, router).await?;

    Ok(())
}
