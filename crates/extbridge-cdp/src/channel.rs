//! CDP WebSocket channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace, warn};

use extbridge_config::CdpConfig;

use crate::error::ChannelError;
use crate::keys::KeyPress;
use crate::protocol::{CdpRequest, CdpResponse};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Request/reply exchange with a remote control endpoint.
#[async_trait]
pub trait AutomationChannel: Send + Sync {
    /// Send one request and wait for its reply's `result`.
    async fn call(&self, method: &str, params: Value) -> Result<Value, ChannelError>;

    /// Release the connection. Calling it again is a no-op.
    async fn close(&self) -> Result<(), ChannelError>;

    /// Dispatch a full key press: key-down, optional char, key-up.
    async fn send_key_press(&self, key: &KeyPress) -> Result<(), ChannelError> {
        for params in key.events() {
            self.call("Input.dispatchKeyEvent", params).await?;
        }
        debug!(key = %key.key, "key press sent");
        Ok(())
    }

    /// Focus the attached page.
    async fn bring_to_front(&self) -> Result<(), ChannelError> {
        self.call("Page.bringToFront", json!({})).await?;
        Ok(())
    }
}

/// A WebSocket connection to a single DevTools target.
///
/// The stream lock is held from send until the matching reply arrives, so at
/// most one request is ever outstanding on the connection.
pub struct CdpChannel {
    endpoint: String,
    stream: Mutex<Option<WsStream>>,
    request_id: AtomicU64,
    call_timeout: Duration,
}

impl CdpChannel {
    /// Connect to a target's `webSocketDebuggerUrl`.
    ///
    /// ```rust,ignore
    /// let channel = CdpChannel::connect("ws://localhost:9222/devtools/page/ABC").await?;
    /// channel.send_key_press(&"Enter".parse()?).await?;
    /// ```
    pub async fn connect(endpoint: &str) -> Result<Self, ChannelError> {
        Self::connect_with_timeouts(endpoint, DEFAULT_CONNECT_TIMEOUT, DEFAULT_CALL_TIMEOUT).await
    }

    pub async fn connect_with_config(
        endpoint: &str,
        config: &CdpConfig,
    ) -> Result<Self, ChannelError> {
        Self::connect_with_timeouts(endpoint, config.connect_timeout(), config.call_timeout())
            .await
    }

    pub async fn connect_with_timeouts(
        endpoint: &str,
        connect_timeout: Duration,
        call_timeout: Duration,
    ) -> Result<Self, ChannelError> {
        let connection_error = |reason: String| ChannelError::Connection {
            endpoint: endpoint.to_string(),
            reason,
        };

        debug!("Connecting to {}", endpoint);
        let (ws_stream, _) =
            tokio::time::timeout(connect_timeout, tokio_tungstenite::connect_async(endpoint))
                .await
                .map_err(|_| connection_error(format!("no handshake within {connect_timeout:?}")))?
                .map_err(|e| connection_error(e.to_string()))?;

        debug!("CDP channel connected to {}", endpoint);
        Ok(Self {
            endpoint: endpoint.to_string(),
            stream: Mutex::new(Some(ws_stream)),
            request_id: AtomicU64::new(1),
            call_timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn is_closed(&self) -> bool {
        self.stream.lock().await.is_none()
    }

    /// Read frames until the reply for `id` shows up.
    ///
    /// Events and replies to abandoned requests are skipped.
    async fn await_reply(ws: &mut WsStream, id: u64, method: &str) -> Result<Value, ChannelError> {
        let protocol_error = |reason: String| ChannelError::Protocol {
            method: method.to_string(),
            reason,
        };

        while let Some(msg) = ws.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    trace!("CDP recv: {}", text);
                    let resp: CdpResponse = serde_json::from_str(&text)
                        .map_err(|e| protocol_error(format!("malformed frame: {e}")))?;

                    match resp.id {
                        Some(reply_id) if reply_id == id => {
                            if let Some(error) = resp.error {
                                return Err(ChannelError::Remote {
                                    method: method.to_string(),
                                    code: error.code,
                                    message: error.message,
                                });
                            }
                            return Ok(resp.result.unwrap_or(Value::Null));
                        }
                        Some(reply_id) => {
                            warn!(expected = id, got = reply_id, "skipping unexpected reply");
                        }
                        None => {
                            trace!(event = ?resp.method, "skipping event");
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    return Err(protocol_error("connection closed before reply".to_string()));
                }
                Ok(_) => {}
                Err(e) => return Err(protocol_error(e.to_string())),
            }
        }

        Err(protocol_error("connection closed before reply".to_string()))
    }
}

#[async_trait]
impl AutomationChannel for CdpChannel {
    async fn call(&self, method: &str, params: Value) -> Result<Value, ChannelError> {
        let mut guard = self.stream.lock().await;
        let ws = guard.as_mut().ok_or(ChannelError::Closed)?;

        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        let request = CdpRequest {
            id,
            method: method.to_string(),
            params: Some(params),
        };
        let json = serde_json::to_string(&request)?;
        trace!("CDP send: {}", json);

        ws.send(Message::Text(json.into()))
            .await
            .map_err(|e| ChannelError::Protocol {
                method: method.to_string(),
                reason: e.to_string(),
            })?;

        match tokio::time::timeout(self.call_timeout, Self::await_reply(ws, id, method)).await {
            Ok(result) => result,
            Err(_) => Err(ChannelError::Timeout {
                method: method.to_string(),
            }),
        }
    }

    async fn close(&self) -> Result<(), ChannelError> {
        let mut guard = self.stream.lock().await;
        if let Some(mut ws) = guard.take() {
            // The peer may already be gone; the connection is released either way.
            if let Err(e) = ws.close(None).await {
                debug!("Close handshake with {} failed: {}", self.endpoint, e);
            }
            debug!("CDP channel to {} closed", self.endpoint);
        }
        Ok(())
    }
}
