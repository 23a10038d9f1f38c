//! Error taxonomy
//!
//! Nothing here is fatal to the page: start errors abort `start` before any
//! state is touched, store errors are logged and the run still terminates.

use serde::Serialize;
use thiserror::Error;

/// Failures surfaced by the lifecycle control surface
#[derive(Debug, Error)]
pub enum GameError {
    /// A required UI surface (play-field or player) was not found
    #[error("required surface #{id} is missing")]
    MissingSurface { id: String },
    /// The start configuration could not be parsed
    #[error("invalid start configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Transient failure from a persistence backend
///
/// Serializes as `{"error": "<message>"}` at the JS boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct StoreError {
    #[serde(rename = "error")]
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
