//! Action sequences under test.

use std::time::Duration;

use extbridge_cdp::KeyPress;
use extbridge_config::ScenarioConfig;

/// A named key sequence plus its timings.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub keys: Vec<KeyPress>,
    /// Pause between consecutive presses.
    pub key_interval: Duration,
    /// Wait after the last press before verifying.
    pub settle: Duration,
}

impl Scenario {
    pub fn new(name: impl Into<String>, keys: Vec<KeyPress>) -> Self {
        let timings = ScenarioConfig::default();
        Self {
            name: name.into(),
            keys,
            key_interval: timings.key_interval(),
            settle: timings.settle(),
        }
    }

    /// Open the tab switcher, move down one entry, confirm.
    pub fn tab_switch() -> Self {
        Self::new(
            "tab switch",
            vec![
                KeyPress::new("t").with_text("t").with_code("KeyT").with_key_code(84),
                KeyPress::new("ArrowDown").with_code("ArrowDown").with_key_code(40),
                KeyPress::new("Enter").with_code("Enter").with_key_code(13),
            ],
        )
    }

    pub fn with_timings(mut self, config: &ScenarioConfig) -> Self {
        self.key_interval = config.key_interval();
        self.settle = config.settle();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_switch_sequence() {
        let scenario = Scenario::tab_switch();
        let keys: Vec<&str> = scenario.keys.iter().map(|k| k.key.as_str()).collect();
        assert_eq!(keys, ["t", "ArrowDown", "Enter"]);
        assert_eq!(scenario.keys[0].text.as_deref(), Some("t"));
        assert!(scenario.keys[1].text.is_none());
        assert_eq!(scenario.key_interval, Duration::from_millis(500));
        assert_eq!(scenario.settle, Duration::from_secs(1));
    }

    #[test]
    fn test_tab_switch_matches_parsed_keys() {
        let parsed: Vec<KeyPress> = ["t", "ArrowDown", "Enter"]
            .iter()
            .map(|k| k.parse().unwrap())
            .collect();
        assert_eq!(Scenario::tab_switch().keys, parsed);
    }

    #[test]
    fn test_with_timings() {
        let config = ScenarioConfig {
            key_interval_ms: 10,
            settle_ms: 20,
        };
        let scenario = Scenario::new("custom", vec![]).with_timings(&config);
        assert_eq!(scenario.key_interval, Duration::from_millis(10));
        assert_eq!(scenario.settle, Duration::from_millis(20));
    }
}
