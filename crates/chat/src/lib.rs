//! Live support chat over a single WebSocket connection.

pub mod error;
pub mod session;

pub use error::ChatError;
pub use session::ChatSession;
