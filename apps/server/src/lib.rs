pub mod api;
pub mod chat_hub;
pub mod config;
pub mod error;
pub mod main_lib;
pub mod products;

pub use config::ServerConfig;
pub use main_lib::{build_app, init_tracing, AppState};
