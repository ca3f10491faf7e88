//! Automation channel errors.

use thiserror::Error;

/// Errors raised while talking to a DevTools endpoint.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The endpoint was unreachable or refused the handshake.
    #[error("Connection to {endpoint} failed: {reason}")]
    Connection { endpoint: String, reason: String },

    /// The connection closed or produced an unparsable frame mid-request.
    #[error("Protocol error during {method}: {reason}")]
    Protocol { method: String, reason: String },

    /// The browser answered with an error object.
    #[error("CDP error during {method}: {message} (code: {code})")]
    Remote {
        method: String,
        code: i64,
        message: String,
    },

    /// No reply arrived in time.
    #[error("Timeout waiting for reply to {method}")]
    Timeout { method: String },

    /// The channel was already closed.
    #[error("Channel closed")]
    Closed,

    /// Target listing failed.
    #[error("Target discovery failed: {0}")]
    Discovery(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ChannelError {
    /// The method whose request triggered the error, when known.
    pub fn method(&self) -> Option<&str> {
        match self {
            ChannelError::Protocol { method, .. }
            | ChannelError::Remote { method, .. }
            | ChannelError::Timeout { method } => Some(method),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ChannelError {
    fn from(e: reqwest::Error) -> Self {
        ChannelError::Discovery(e.to_string())
    }
}
