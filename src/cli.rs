//! CLI definitions for extbridge.

use clap::{Args, Parser, Subcommand};

use extbridge_cdp::KeyPress;
use extbridge_config::Config;

/// extbridge CLI.
#[derive(Parser)]
#[command(name = "extbridge")]
#[command(about = "End-to-end browser extension testing over a pull bridge and CDP")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "extbridge.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Serve the bridge for the extension until interrupted
    Serve(BridgeArgs),

    /// Run the tab-switch scenario (default)
    Run(RunArgs),

    /// List the pages exposed by the DevTools endpoint
    Targets {
        /// DevTools HTTP endpoint
        #[arg(long, env = "EXTBRIDGE_CDP_ENDPOINT")]
        http_endpoint: Option<String>,
    },
}

#[derive(Args, Default)]
pub(crate) struct BridgeArgs {
    /// Bridge host
    #[arg(long)]
    pub host: Option<String>,

    /// Bridge port
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Args, Default)]
pub(crate) struct RunArgs {
    #[command(flatten)]
    pub bridge: BridgeArgs,

    /// WebSocket URL of the page to drive
    #[arg(long)]
    pub page_url: Option<String>,

    /// Title or URL fragment of the page to drive
    #[arg(long, conflicts_with = "page_url")]
    pub page_match: Option<String>,

    /// Keys to press instead of the tab-switch sequence, e.g. `t,ArrowDown,Enter`
    #[arg(long, value_delimiter = ',')]
    pub keys: Vec<KeyPress>,

    /// Pause between key presses in milliseconds
    #[arg(long)]
    pub key_interval_ms: Option<u64>,

    /// Wait before verifying in milliseconds
    #[arg(long)]
    pub settle_ms: Option<u64>,
}

impl BridgeArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.bridge.host = host.clone();
        }
        if let Some(port) = self.port {
            config.bridge.port = port;
        }
    }
}

impl RunArgs {
    pub fn apply(&self, config: &mut Config) {
        self.bridge.apply(config);
        if let Some(url) = &self.page_url {
            config.cdp.page_url = Some(url.clone());
            config.cdp.page_match = None;
        }
        if let Some(pattern) = &self.page_match {
            config.cdp.page_url = None;
            config.cdp.page_match = Some(pattern.clone());
        }
        if let Some(ms) = self.key_interval_ms {
            config.scenario.key_interval_ms = ms;
        }
        if let Some(ms) = self.settle_ms {
            config.scenario.settle_ms = ms;
        }
    }
}
