//! `serve` subcommand handler.

use std::sync::Arc;

use tracing::info;

use extbridge_bridge::{BridgeServer, BridgeState};
use extbridge_config::Config;

/// Serve the bridge in the foreground until Ctrl+C.
///
/// Commands arrive over `POST /send_command` and are relayed to the polling extension.
pub(crate) async fn serve(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(BridgeState::from_config(&config.bridge));
    let server = BridgeServer::bind(&config.bridge.addr(), state.clone()).await?;
    let addr = server.local_addr()?;
    info!("Drive the extension with POST http://{}/send_command", addr);

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            let stats = state.stats();
            info!(
                pending = stats.pending,
                results = stats.results,
                "Interrupted, stopping bridge server"
            );
        }
    }
    Ok(())
}
