//! HTTP routes polled by the extension, plus the driver-side entry point.
//!
//! ```text
//! GET  /get_command    - Claim the next command, `null` when the queue is empty
//! POST /post_response  - Submit a command result
//! POST /send_command   - Queue a command and wait for its result
//! GET  /livez          - Liveness probe with queue counters
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::client::BridgeClient;
use crate::error::BridgeError;
use crate::protocol::{Command, CommandResult, ResultSubmission, SendCommandRequest};
use crate::state::BridgeState;

/// Create the bridge router around an injected state.
pub fn create_router(state: Arc<BridgeState>) -> Router {
    Router::new()
        .route("/get_command", get(get_command))
        .route("/post_response", post(post_response))
        .route("/send_command", post(send_command))
        .route("/livez", get(liveness))
        .with_state(state)
}

async fn get_command(State(state): State<Arc<BridgeState>>) -> Json<Option<Command>> {
    Json(state.claim_next_command())
}

async fn post_response(
    State(state): State<Arc<BridgeState>>,
    Json(submission): Json<ResultSubmission>,
) -> Json<Value> {
    state.submit_result(CommandResult::from(submission));
    Json(json!({"status": "ok"}))
}

async fn send_command(
    State(state): State<Arc<BridgeState>>,
    Json(request): Json<SendCommandRequest>,
) -> (StatusCode, Json<Value>) {
    let client = BridgeClient::new(state);
    let timeout = request
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| client.default_timeout());

    match client
        .send_command(&request.command, request.params, timeout)
        .await
    {
        Ok(data) => (StatusCode::OK, Json(json!({"success": true, "data": data}))),
        Err(BridgeError::RemoteCommand { message, .. }) => failure(StatusCode::BAD_GATEWAY, message),
        Err(e) if e.is_timeout() => failure(StatusCode::GATEWAY_TIMEOUT, e.to_string()),
        Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

fn failure(status: StatusCode, error: String) -> (StatusCode, Json<Value>) {
    (status, Json(json!({"success": false, "error": error})))
}

async fn liveness(State(state): State<Arc<BridgeState>>) -> Json<Value> {
    let stats = state.stats();
    Json(json!({
        "status": "ok",
        "pending": stats.pending,
        "results": stats.results,
    }))
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
