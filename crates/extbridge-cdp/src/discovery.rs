//! Target lookup through the DevTools HTTP endpoint.

use tracing::debug;

use crate::error::ChannelError;
use crate::protocol::TargetInfo;

/// List the targets exposed at `<http_endpoint>/json/list`.
pub async fn list_targets(http_endpoint: &str) -> Result<Vec<TargetInfo>, ChannelError> {
    let url = format!("{}/json/list", http_endpoint.trim_end_matches('/'));
    debug!("Fetching targets from {}", url);

    let targets: Vec<TargetInfo> = reqwest::get(&url)
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(targets)
}

/// First connectable page whose title or URL contains `pattern`.
pub fn find_page<'a>(targets: &'a [TargetInfo], pattern: &str) -> Option<&'a TargetInfo> {
    targets.iter().find(|t| {
        t.target_type == "page"
            && t.web_socket_debugger_url.is_some()
            && (t.title.contains(pattern) || t.url.contains(pattern))
    })
}

/// Resolve the WebSocket URL of the page matching `pattern`.
pub async fn resolve_page_url(http_endpoint: &str, pattern: &str) -> Result<String, ChannelError> {
    let targets = list_targets(http_endpoint).await?;
    find_page(&targets, pattern)
        .and_then(|t| t.web_socket_debugger_url.clone())
        .ok_or_else(|| {
            ChannelError::Discovery(format!(
                "no page matching '{}' among {} targets",
                pattern,
                targets.len()
            ))
        })
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
