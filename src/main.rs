use std::env;

use axum::Router;
use movielist::{config, modules, AppState};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // The service cannot run without its database.
    let db = match config::database::connect().await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to acquire database handle");
            std::process::exit(1);
        }
    };

    let state = AppState { db };

    let app = Router::new()
        .merge(modules::health::routes::routes())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
