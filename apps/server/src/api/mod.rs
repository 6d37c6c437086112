use std::sync::Arc;

use axum::Router;

use crate::main_lib::AppState;

pub mod chat;
pub mod health;
pub mod products;

/// All HTTP and WebSocket routes, before middleware.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::router())
        .merge(products::router())
        .merge(chat::router())
}
