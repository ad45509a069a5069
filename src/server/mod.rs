pub mod handlers;
pub mod types;

use crate::{
    Result,
    backend::QueueClient,
    config::{Config, ServerConfig},
    relay::RelayHandler,
};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

pub fn app(state: AppState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/", get(handlers::health))
        .route("/analyze", post(handlers::analyze))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    match cors_layer(&config.cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

pub async fn run(config: Config) -> Result<()> {
    let backend = QueueClient::new(config.backend.clone());
    let relay = RelayHandler::new(Arc::new(backend), &config.backend);

    let app_state = AppState {
        relay: Arc::new(relay),
    };
    let app = app(app_state, &config.server);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);
    info!("Relaying to backend at {}", config.backend.join_url());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
