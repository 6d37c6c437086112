//! Error types for the chat session.

use thiserror::Error;

/// Failures of the chat connection. They are logged and end the session;
/// nothing is retried.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The WebSocket handshake did not complete
    #[error("Failed to connect to chat endpoint: {0}")]
    Connect(#[source] tokio_tungstenite::tungstenite::Error),

    /// The established connection failed while reading or writing
    #[error("Chat connection failed: {0}")]
    Socket(#[source] tokio_tungstenite::tungstenite::Error),

    /// The session task panicked or was cancelled
    #[error("Chat session task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
