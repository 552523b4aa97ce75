//! crates/book_review_core/src/error.rs
//!
//! Failure taxonomy for user-initiated actions (forms and authenticated reads).

use crate::gateway::GatewayError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// A required field was empty; nothing was sent.
    #[error("{0}")]
    LocalValidation(String),

    /// The server refused the input.
    #[error("{0}")]
    RemoteValidation(String),

    /// The server rejected the session. The stored session has been cleared.
    #[error("authentication error: please log in")]
    Authentication,

    #[error("{0}")]
    TransportOrServer(String),
}

impl ActionError {
    /// Maps a gateway failure, using `fallback` as the user-facing text when the
    /// server supplied none.
    pub fn from_gateway(error: GatewayError, fallback: &str) -> Self {
        match error {
            GatewayError::ValidationFailed {
                message: Some(message),
                ..
            } => ActionError::RemoteValidation(message),
            GatewayError::ValidationFailed { message: None, .. } => {
                ActionError::RemoteValidation(fallback.to_string())
            }
            GatewayError::Unauthorized => ActionError::Authentication,
            GatewayError::NetworkOrServer(_) => ActionError::TransportOrServer(fallback.to_string()),
        }
    }

    pub fn requires_login(&self) -> bool {
        matches!(self, ActionError::Authentication)
    }
}

pub type ActionResult<T> = Result<T, ActionError>;
