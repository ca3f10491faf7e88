//! State observation through the bridge.

use async_trait::async_trait;
use serde::Serialize;

use extbridge_bridge::{BridgeClient, BridgeError};

/// An observed state: `id` is compared, `label` is for humans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub id: String,
    pub label: String,
}

impl Snapshot {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Source of before/after snapshots.
#[async_trait]
pub trait StateProbe: Send + Sync {
    async fn snapshot(&self) -> Result<Snapshot, BridgeError>;
}

/// Observes the active tab through the extension.
pub struct ActiveTabProbe {
    client: BridgeClient,
}

impl ActiveTabProbe {
    pub fn new(client: BridgeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StateProbe for ActiveTabProbe {
    async fn snapshot(&self) -> Result<Snapshot, BridgeError> {
        let tab = self.client.get_active_tab().await?;
        Ok(Snapshot::new(tab.id.to_string(), tab.title))
    }
}
