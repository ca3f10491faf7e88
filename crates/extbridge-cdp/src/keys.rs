//! Key press intents and their `Input.dispatchKeyEvent` decomposition.

use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};
use thiserror::Error;

use crate::protocol::KeyEventType;

/// A single semantic key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// Logical key name (`"t"`, `"Enter"`, `"ArrowDown"`).
    pub key: String,
    /// Character inserted by the press, if printable.
    pub text: Option<String>,
    /// Physical key code (`"KeyT"`).
    pub code: Option<String>,
    /// Legacy virtual key code.
    pub key_code: Option<u32>,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: None,
            code: None,
            key_code: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_key_code(mut self, key_code: u32) -> Self {
        self.key_code = Some(key_code);
        self
    }

    /// Params for each `Input.dispatchKeyEvent` request, in dispatch order.
    ///
    /// A char event is only produced when `text` is set, and always sits
    /// between key-down and key-up.
    pub fn events(&self) -> Vec<Value> {
        let mut events = vec![self.edge_event(KeyEventType::KeyDown)];
        if let Some(text) = &self.text {
            events.push(json!({
                "type": KeyEventType::Char,
                "text": text,
                "key": self.key,
            }));
        }
        events.push(self.edge_event(KeyEventType::KeyUp));
        events
    }

    fn edge_event(&self, event_type: KeyEventType) -> Value {
        let mut params = json!({
            "type": event_type,
            "key": self.key,
        });
        if let Some(code) = &self.code {
            params["code"] = json!(code);
        }
        if let Some(key_code) = self.key_code {
            params["windowsVirtualKeyCode"] = json!(key_code);
            params["nativeVirtualKeyCode"] = json!(key_code);
        }
        params
    }

    fn named(key: &str) -> Option<Self> {
        let key_code = match key {
            "Backspace" => 8,
            "Tab" => 9,
            "Enter" => 13,
            "Escape" => 27,
            "PageUp" => 33,
            "PageDown" => 34,
            "End" => 35,
            "Home" => 36,
            "ArrowLeft" => 37,
            "ArrowUp" => 38,
            "ArrowRight" => 39,
            "ArrowDown" => 40,
            "Delete" => 46,
            _ => return None,
        };
        Some(Self::new(key).with_code(key).with_key_code(key_code))
    }

    fn printable(c: char) -> Self {
        let upper = c.to_ascii_uppercase();
        let press = Self::new(c.to_string()).with_text(c.to_string());
        match c {
            'a'..='z' | 'A'..='Z' => press
                .with_code(format!("Key{upper}"))
                .with_key_code(upper as u32),
            '0'..='9' => press.with_code(format!("Digit{c}")).with_key_code(c as u32),
            ' ' => press.with_code("Space").with_key_code(32),
            _ => press,
        }
    }
}

/// Returned when parsing an empty key name.
#[derive(Debug, Error)]
#[error("Key name cannot be empty")]
pub struct EmptyKeyName;

impl FromStr for KeyPress {
    type Err = EmptyKeyName;

    /// Parse a key name such as `t`, `Enter` or `ArrowDown`.
    ///
    /// Single characters become printable presses; well-known names get
    /// their physical and legacy codes; anything else is sent by name only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(EmptyKeyName),
            (Some(c), None) => Ok(Self::printable(c)),
            _ => Ok(Self::named(s).unwrap_or_else(|| Self::new(s))),
        }
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;
