//! Chat session state machine and transcript.

mod chat_state_model;

pub use chat_state_model::*;
