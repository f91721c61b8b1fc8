//! Tarot carousel API server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use carousel_api::error::AppError;
use carousel_api::state::AppState;
use carousel_core::clock::SystemClock;
use carousel_core::config::CarouselConfig;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting tarot carousel API server");

    // Read configuration from environment.
    let config = CarouselConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?;
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?;
    let idle_secs: u32 = std::env::var("CAROUSEL_SESSION_IDLE_SECS")
        .unwrap_or_else(|_| "1800".to_string())
        .parse()
        .map_err(|e| AppError::Config(format!("CAROUSEL_SESSION_IDLE_SECS must be a valid u32: {e}")))?;

    tracing::info!(
        deck_size = config.deck_size,
        flip_delay_ms = config.flip_delay_ms,
        auto_advance_delay_ms = config.auto_advance_delay_ms,
        idle_secs,
        "carousel configuration loaded"
    );

    let app_state = AppState::new(Arc::new(SystemClock), config);

    // Sweep idle sessions once a minute.
    let evictor = app_state.clone();
    let idle_for = chrono::Duration::seconds(i64::from(idle_secs));
    tokio::spawn(async move {
        let mut sweep = tokio::time::interval(Duration::from_secs(60));
        loop {
            sweep.tick().await;
            let evicted = evictor.evict_idle(evictor.clock.now(), idle_for).await;
            if evicted > 0 {
                tracing::info!(evicted, "evicted idle carousel sessions");
            }
        }
    });

    // TODO: Replace CorsLayer::permissive() with the embedding app's origins.
    let app = carousel_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server.
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
