//! Shared bridge state: the pending queue and the result table.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, warn};

use extbridge_config::BridgeConfig;

use crate::protocol::{Command, CommandResult};

const DEFAULT_RESULT_TTL: Duration = Duration::from_secs(60);

struct StoredResult {
    result: CommandResult,
    stored_at: Instant,
}

#[derive(Default)]
struct Inner {
    queue: VecDeque<Command>,
    results: HashMap<String, StoredResult>,
    waiters: HashMap<String, Arc<Notify>>,
}

/// Counters exposed on the liveness endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BridgeStats {
    pub pending: usize,
    pub results: usize,
    pub waiters: usize,
}

/// Queue of unclaimed commands plus the table of unconsumed results.
///
/// Every operation runs under one lock, so a claim or a submission is never
/// observed half-applied.
pub struct BridgeState {
    inner: Mutex<Inner>,
    result_ttl: Duration,
}

impl BridgeState {
    pub fn new(result_ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            result_ttl,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.result_ttl())
    }

    /// Append a command and register a waiter for its result.
    pub fn enqueue(&self, command: Command) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        let mut inner = self.inner.lock();
        inner.waiters.insert(command.id.clone(), notify.clone());
        debug!(id = %command.id, command = %command.name, "command queued");
        inner.queue.push_back(command);
        notify
    }

    /// Remove and return the oldest unclaimed command.
    pub fn claim_next_command(&self) -> Option<Command> {
        let mut inner = self.inner.lock();
        self.expire_stale(&mut inner);
        let command = inner.queue.pop_front();
        if let Some(cmd) = &command {
            debug!(id = %cmd.id, command = %cmd.name, "command claimed");
        }
        command
    }

    /// Store a result, replacing any unconsumed one with the same id.
    ///
    /// Returns `true` when an earlier result was replaced.
    pub fn submit_result(&self, result: CommandResult) -> bool {
        let mut inner = self.inner.lock();
        self.expire_stale(&mut inner);

        let id = result.id.clone();
        let replaced = inner
            .results
            .insert(
                id.clone(),
                StoredResult {
                    result,
                    stored_at: Instant::now(),
                },
            )
            .is_some();

        if replaced {
            warn!(id = %id, "duplicate result submitted, overwriting");
        } else {
            debug!(id = %id, "result stored");
        }

        if let Some(waiter) = inner.waiters.get(&id) {
            waiter.notify_one();
        }
        replaced
    }

    /// Remove and return the result for `id`, if it has arrived.
    pub fn take_result(&self, id: &str) -> Option<CommandResult> {
        self.inner.lock().results.remove(id).map(|stored| stored.result)
    }

    /// Forget the waiter registered by [`enqueue`](Self::enqueue).
    pub fn release_waiter(&self, id: &str) {
        self.inner.lock().waiters.remove(id);
    }

    pub fn stats(&self) -> BridgeStats {
        let inner = self.inner.lock();
        BridgeStats {
            pending: inner.queue.len(),
            results: inner.results.len(),
            waiters: inner.waiters.len(),
        }
    }

    fn expire_stale(&self, inner: &mut Inner) {
        let ttl = self.result_ttl;
        let before = inner.results.len();
        inner
            .results
            .retain(|_, stored| stored.stored_at.elapsed() <= ttl);
        let expired = before - inner.results.len();
        if expired > 0 {
            debug!(expired, "expired stale results");
        }
    }
}

impl Default for BridgeState {
    fn default() -> Self {
        Self::new(DEFAULT_RESULT_TTL)
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
