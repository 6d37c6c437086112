use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::main_lib::AppState;

async fn root() -> Json<Value> {
    Json(json!({ "message": "Storefront API is running" }))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}
