//! Bridge wire types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

fn empty_params() -> Value {
    serde_json::json!({})
}

/// A command waiting for the extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub id: String,
    /// The extension dispatches on the `command` field.
    #[serde(rename = "command", alias = "name")]
    pub name: String,
    #[serde(default = "empty_params", alias = "parameters")]
    pub params: Value,
}

impl Command {
    /// Create a command with a fresh random id.
    pub fn new(name: impl Into<String>, params: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            params,
        }
    }
}

/// Outcome of a command as reported by the extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResult {
    pub id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResult {
    pub fn ok(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Result body as nested by the extension's `bridge.js`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body accepted by `POST /post_response`.
///
/// Both `{id, result: {success, data, error}}` and the flat
/// `{id, success, data, error}` shape are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResultSubmission {
    Nested { id: String, result: ResultBody },
    Flat(CommandResult),
}

impl From<ResultSubmission> for CommandResult {
    fn from(submission: ResultSubmission) -> Self {
        match submission {
            ResultSubmission::Nested { id, result } => CommandResult {
                id,
                success: result.success,
                data: result.data,
                error: result.error,
            },
            ResultSubmission::Flat(result) => result,
        }
    }
}

/// Body accepted by `POST /send_command`, the driver-side entry point.
#[derive(Debug, Clone, Deserialize)]
pub struct SendCommandRequest {
    #[serde(alias = "name")]
    pub command: String,
    #[serde(default = "empty_params", alias = "parameters")]
    pub params: Value,
    /// Falls back to the client's default timeout.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// A browser tab as described by the extension's tab queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_id: Option<i64>,
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
