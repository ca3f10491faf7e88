//! Caller-facing half of the bridge.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::time::Instant;
use tracing::{debug, warn};

use extbridge_config::BridgeConfig;

use crate::error::BridgeError;
use crate::protocol::{Command, CommandResult, TabInfo};
use crate::state::BridgeState;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Drops the waiter registration on every exit path, including cancellation.
struct WaiterGuard<'a> {
    state: &'a BridgeState,
    id: &'a str,
}

impl Drop for WaiterGuard<'_> {
    fn drop(&mut self) {
        self.state.release_waiter(self.id);
    }
}

/// Sends commands to the extension and waits for their results.
#[derive(Clone)]
pub struct BridgeClient {
    state: Arc<BridgeState>,
    poll_interval: Duration,
    default_timeout: Duration,
}

impl BridgeClient {
    pub fn new(state: Arc<BridgeState>) -> Self {
        Self {
            state,
            poll_interval: DEFAULT_POLL_INTERVAL,
            default_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(state: Arc<BridgeState>, config: &BridgeConfig) -> Self {
        Self::new(state)
            .with_poll_interval(config.poll_interval())
            .with_default_timeout(config.command_timeout())
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Queue a command and wait up to `timeout` for its result.
    ///
    /// Returns the result's `data` (or `null`) on success. Never retries.
    pub async fn send_command(
        &self,
        name: &str,
        params: Value,
        timeout: Duration,
    ) -> Result<Value, BridgeError> {
        let command = Command::new(name, params);
        let id = command.id.clone();
        let notify = self.state.enqueue(command);
        let _guard = WaiterGuard {
            state: &self.state,
            id: &id,
        };
        debug!(command = name, id = %id, "waiting for extension");

        // A timeout too large to represent as an instant never expires.
        let deadline = Instant::now().checked_add(timeout);
        loop {
            if let Some(result) = self.state.take_result(&id) {
                debug!(command = name, id = %id, success = result.success, "got result");
                return Self::into_outcome(name, result);
            }

            let now = Instant::now();
            let remaining = match deadline {
                Some(deadline) if now >= deadline => {
                    warn!(command = name, id = %id, "extension did not respond in {:?}", timeout);
                    return Err(BridgeError::Timeout {
                        command: name.to_string(),
                        timeout,
                    });
                }
                Some(deadline) => deadline - now,
                None => self.poll_interval,
            };

            // The notification is the fast path; the interval bounds a recheck.
            let wait = remaining.min(self.poll_interval);
            let _ = tokio::time::timeout(wait, notify.notified()).await;
        }
    }

    /// Send a command with the default timeout and decode its data.
    pub async fn request<T: DeserializeOwned>(
        &self,
        name: &str,
        params: Value,
    ) -> Result<T, BridgeError> {
        let data = self.send_command(name, params, self.default_timeout).await?;
        serde_json::from_value(data).map_err(|source| BridgeError::Decode {
            command: name.to_string(),
            source,
        })
    }

    /// The tab focused in the current window.
    pub async fn get_active_tab(&self) -> Result<TabInfo, BridgeError> {
        self.request("get_active_tab", json!({})).await
    }

    /// Every open tab.
    pub async fn get_all_tabs(&self) -> Result<Vec<TabInfo>, BridgeError> {
        self.request("get_all_tabs", json!({})).await
    }

    fn into_outcome(name: &str, result: CommandResult) -> Result<Value, BridgeError> {
        if result.success {
            Ok(result.data.unwrap_or(Value::Null))
        } else {
            Err(BridgeError::RemoteCommand {
                command: name.to_string(),
                message: result.error.unwrap_or_else(|| "Unknown error".to_string()),
            })
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
