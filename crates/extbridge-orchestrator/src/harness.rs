//! Wiring of the bridge server, bridge client and automation channel.

use std::sync::Arc;

use tracing::{info, warn};

use extbridge_bridge::{BridgeClient, BridgeServer, BridgeServerHandle, BridgeState};
use extbridge_cdp::{discovery, AutomationChannel, CdpChannel, ChannelError};
use extbridge_config::{CdpConfig, Config};

use crate::error::RunError;
use crate::probe::ActiveTabProbe;
use crate::runner::{Orchestrator, Phase, RunReport};
use crate::scenario::Scenario;

/// WebSocket URL of the page to drive.
///
/// An explicit `page_url` wins; otherwise `page_match` is looked up through
/// the DevTools HTTP endpoint.
pub async fn resolve_endpoint(cdp: &CdpConfig) -> Result<String, ChannelError> {
    if let Some(url) = &cdp.page_url {
        return Ok(url.clone());
    }
    match &cdp.page_match {
        Some(pattern) => discovery::resolve_page_url(&cdp.http_endpoint, pattern).await,
        None => Err(ChannelError::Discovery(
            "set cdp.page_url or cdp.page_match".to_string(),
        )),
    }
}

/// Everything a run needs, set up and ready.
pub struct Harness {
    server: BridgeServerHandle,
    client: BridgeClient,
    channel: CdpChannel,
}

impl Harness {
    /// Start the bridge server and attach to the target page.
    pub async fn setup(config: &Config) -> Result<Self, RunError> {
        info!(phase = %Phase::Setup, "entering phase");

        let state = Arc::new(BridgeState::from_config(&config.bridge));
        let server = BridgeServer::bind(&config.bridge.addr(), state.clone())
            .await
            .and_then(BridgeServer::spawn)
            .map_err(RunError::BridgeStartup)?;
        let client = BridgeClient::from_config(state, &config.bridge);

        let channel = match Self::attach(&config.cdp).await {
            Ok(channel) => channel,
            Err(e) => {
                if let Err(stop) = server.shutdown().await {
                    warn!("stopping bridge server failed: {}", stop);
                }
                return Err(RunError::Connect(e));
            }
        };

        Ok(Self {
            server,
            client,
            channel,
        })
    }

    async fn attach(cdp: &CdpConfig) -> Result<CdpChannel, ChannelError> {
        let endpoint = resolve_endpoint(cdp).await?;
        let channel = CdpChannel::connect_with_config(&endpoint, cdp).await?;
        if let Err(e) = channel.bring_to_front().await {
            if let Err(close) = channel.close().await {
                warn!("closing automation channel failed: {}", close);
            }
            return Err(e);
        }
        info!("attached to {}", endpoint);
        Ok(channel)
    }

    /// Base URL the extension should poll.
    pub fn bridge_url(&self) -> String {
        self.server.base_url()
    }

    /// Run the scenario, then stop the bridge server.
    pub async fn run(self, scenario: &Scenario) -> RunReport {
        let probe = ActiveTabProbe::new(self.client);
        let mut report = Orchestrator::new(&self.channel, &probe).run(scenario).await;
        report.phases.insert(0, Phase::Setup);

        if let Err(e) = self.server.shutdown().await {
            warn!("stopping bridge server failed: {}", e);
        }
        report
    }
}
