//! Configuration schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bridge: BridgeConfig,

    #[serde(default)]
    pub cdp: CdpConfig,

    #[serde(default)]
    pub scenario: ScenarioConfig,
}

/// Bridge server and client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_bridge_host")]
    pub host: String,

    /// The extension polls a fixed address, so this normally stays at 8888.
    #[serde(default = "default_bridge_port")]
    pub port: u16,

    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,

    /// Upper bound between result-table rechecks while a client waits.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Unclaimed results older than this are dropped.
    #[serde(default = "default_result_ttl")]
    pub result_ttl_secs: u64,
}

impl BridgeConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn result_ttl(&self) -> Duration {
        Duration::from_secs(self.result_ttl_secs)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: default_bridge_host(),
            port: default_bridge_port(),
            command_timeout_secs: default_command_timeout(),
            poll_interval_ms: default_poll_interval(),
            result_ttl_secs: default_result_ttl(),
        }
    }
}

fn default_bridge_host() -> String {
    "127.0.0.1".to_string()
}

fn default_bridge_port() -> u16 {
    8888
}

fn default_command_timeout() -> u64 {
    5
}

fn default_poll_interval() -> u64 {
    50
}

fn default_result_ttl() -> u64 {
    60
}

/// DevTools automation channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdpConfig {
    /// HTTP endpoint serving `/json/list`.
    #[serde(default = "default_http_endpoint")]
    pub http_endpoint: String,

    /// Explicit page WebSocket URL. Takes precedence over `page_match`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,

    /// Substring of the title or URL of the page to drive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_match: Option<String>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,
}

impl CdpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

impl Default for CdpConfig {
    fn default() -> Self {
        Self {
            http_endpoint: default_http_endpoint(),
            page_url: None,
            page_match: None,
            connect_timeout_secs: default_connect_timeout(),
            call_timeout_secs: default_call_timeout(),
        }
    }
}

fn default_http_endpoint() -> String {
    "http://localhost:9222".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_call_timeout() -> u64 {
    30
}

/// Timings of the end-to-end scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "default_key_interval")]
    pub key_interval_ms: u64,

    #[serde(default = "default_settle")]
    pub settle_ms: u64,
}

impl ScenarioConfig {
    pub fn key_interval(&self) -> Duration {
        Duration::from_millis(self.key_interval_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            key_interval_ms: default_key_interval(),
            settle_ms: default_settle(),
        }
    }
}

fn default_key_interval() -> u64 {
    500
}

fn default_settle() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bridge.addr(), "127.0.0.1:8888");
        assert_eq!(config.bridge.command_timeout(), Duration::from_secs(5));
        assert_eq!(config.bridge.poll_interval(), Duration::from_millis(50));
        assert_eq!(config.cdp.http_endpoint, "http://localhost:9222");
        assert!(config.cdp.page_url.is_none());
        assert_eq!(config.scenario.settle(), Duration::from_secs(1));
    }

    #[test]
    fn test_serialize_skips_unset_page() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("[bridge]"));
        assert!(!text.contains("page_url"));
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: Config = toml::from_str("[cdp]\npage_match = \"Google\"").unwrap();
        assert_eq!(config.cdp.page_match.as_deref(), Some("Google"));
        assert_eq!(config.cdp.call_timeout_secs, 30);
        assert_eq!(config.bridge.port, 8888);
    }
}
