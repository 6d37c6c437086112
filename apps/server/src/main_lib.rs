use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::api;
use crate::chat_hub::ChatHub;
use crate::config::ServerConfig;
use crate::products::{InMemoryProductRepository, ProductService};

/// Shared handler state.
pub struct AppState {
    pub product_service: ProductService,
    pub chat_hub: ChatHub,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            product_service: ProductService::new(Arc::new(InMemoryProductRepository::new())),
            chat_hub: ChatHub::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Ignoring invalid CORS origin '{}'", origin);
            layer
        }
    }
}

pub fn build_app(state: Arc<AppState>, config: &ServerConfig) -> Router {
    api::router()
        .layer(cors_layer(&config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
