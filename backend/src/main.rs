use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pantry_chef_backend::{logging, routes, AppState, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pantry Chef API");

    let state = Arc::new(AppState::from_config(config).await?);

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::me::router(state.clone()))
        .merge(routes::pantry::router(state.clone()))
        .merge(routes::recipes::router(state.clone()))
        .merge(routes::meals::router(state.clone()))
        .layer(cors)
        .layer(middleware::from_fn(logging::request_logger))
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    );
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
