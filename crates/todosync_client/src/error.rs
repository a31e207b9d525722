//! Error types for the client.

use thiserror::Error;
use todosync_model::ValidationError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by the store and its transport.
///
/// Every public operation normalizes whatever the transport raises into
/// one of these kinds before it reaches the caller; no raw transport
/// error escapes unwrapped.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// A client-side precondition failed; no network call was made.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The server reported no resource with the given id.
    #[error("todo not found: {id}")]
    NotFound {
        /// The id that was not found.
        id: String,
    },

    /// The server answered with a non-success status.
    #[error("server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// Anything that fits no other kind.
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl ClientError {
    /// Creates a not-found error for the given id.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a server error.
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Returns true if the server reported the resource missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if the failure happened before any request was sent.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
