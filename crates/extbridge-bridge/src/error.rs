//! Bridge error types.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the bridge server and client.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No result arrived before the caller's deadline.
    #[error("Extension did not respond to {command} within {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    /// The extension reported a failure.
    #[error("Extension failed {command}: {message}")]
    RemoteCommand { command: String, message: String },

    /// The result payload did not have the expected shape.
    #[error("Unexpected data for {command}: {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// Binding or serving failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The server task ended abnormally.
    #[error("Server error: {0}")]
    Server(String),
}

impl BridgeError {
    /// Whether the error is a missed deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BridgeError::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_names_command() {
        let err = BridgeError::Timeout {
            command: "get_active_tab".to_string(),
            timeout: Duration::from_secs(5),
        };
        assert!(err.is_timeout());
        assert!(err.to_string().contains("get_active_tab"));
        assert!(err.to_string().contains("5s"));
    }

    #[test]
    fn test_remote_error_verbatim() {
        let err = BridgeError::RemoteCommand {
            command: "get_all_tabs".to_string(),
            message: "No tabs permission".to_string(),
        };
        assert!(!err.is_timeout());
        assert!(err.to_string().ends_with("No tabs permission"));
    }
}
