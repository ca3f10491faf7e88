use super::*;
use crate::channel::AutomationChannel;
use crate::error::ChannelError;
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Default)]
struct RecordingChannel {
    calls: Mutex<Vec<(String, Value)>>,
    fail_on: Option<usize>,
}

#[async_trait]
impl AutomationChannel for RecordingChannel {
    async fn call(&self, method: &str, params: Value) -> Result<Value, ChannelError> {
        let mut calls = self.calls.lock().unwrap();
        if self.fail_on == Some(calls.len()) {
            return Err(ChannelError::Protocol {
                method: method.to_string(),
                reason: "connection closed before reply".to_string(),
            });
        }
        calls.push((method.to_string(), params));
        Ok(json!({}))
    }

    async fn close(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}

impl RecordingChannel {
    fn event_types(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, params)| params["type"].as_str().unwrap().to_string())
            .collect()
    }
}

#[tokio::test]
async fn test_printable_press_sends_three_events() {
    let channel = RecordingChannel::default();
    let key = KeyPress::new("t").with_text("t");

    channel.send_key_press(&key).await.unwrap();

    assert_eq!(channel.event_types(), ["keyDown", "char", "keyUp"]);
    let calls = channel.calls.lock().unwrap();
    for (method, params) in calls.iter() {
        assert_eq!(method, "Input.dispatchKeyEvent");
        assert_eq!(params["key"], "t");
    }
    assert_eq!(calls[1].1["text"], "t");
}

#[tokio::test]
async fn test_named_press_sends_two_events() {
    let channel = RecordingChannel::default();

    channel.send_key_press(&KeyPress::new("Enter")).await.unwrap();

    assert_eq!(channel.event_types(), ["keyDown", "keyUp"]);
}

#[tokio::test]
async fn test_failure_stops_the_sequence() {
    let channel = RecordingChannel {
        fail_on: Some(1),
        ..Default::default()
    };
    let key = KeyPress::new("t").with_text("t");

    let err = channel.send_key_press(&key).await.unwrap_err();

    assert!(matches!(err, ChannelError::Protocol { .. }));
    assert_eq!(channel.event_types(), ["keyDown"]);
}

#[tokio::test]
async fn test_bring_to_front() {
    let channel = RecordingChannel::default();
    channel.bring_to_front().await.unwrap();
    assert_eq!(channel.calls.lock().unwrap()[0].0, "Page.bringToFront");
}

#[test]
fn test_identity_fields_on_edge_events() {
    let events = KeyPress::new("ArrowDown")
        .with_code("ArrowDown")
        .with_key_code(40)
        .events();

    assert_eq!(events.len(), 2);
    for event in &events {
        assert_eq!(event["key"], "ArrowDown");
        assert_eq!(event["code"], "ArrowDown");
        assert_eq!(event["windowsVirtualKeyCode"], 40);
        assert_eq!(event["nativeVirtualKeyCode"], 40);
    }
}

#[test]
fn test_unset_fields_are_omitted() {
    let events = KeyPress::new("F5").events();
    assert!(events[0].get("code").is_none());
    assert!(events[0].get("windowsVirtualKeyCode").is_none());
}

#[test]
fn test_parse_letter() {
    let key: KeyPress = "t".parse().unwrap();
    assert_eq!(
        key,
        KeyPress::new("t").with_text("t").with_code("KeyT").with_key_code(84)
    );
}

#[test]
fn test_parse_digit_and_space() {
    let digit: KeyPress = "5".parse().unwrap();
    assert_eq!(digit.code.as_deref(), Some("Digit5"));
    assert_eq!(digit.key_code, Some(53));

    let space: KeyPress = " ".parse().unwrap();
    assert_eq!(space.code.as_deref(), Some("Space"));
    assert_eq!(space.text.as_deref(), Some(" "));
}

#[test]
fn test_parse_named_keys() {
    let enter: KeyPress = "Enter".parse().unwrap();
    assert_eq!(enter.key_code, Some(13));
    assert!(enter.text.is_none());

    let down: KeyPress = "ArrowDown".parse().unwrap();
    assert_eq!(down.code.as_deref(), Some("ArrowDown"));
    assert_eq!(down.key_code, Some(40));
}

#[test]
fn test_parse_unknown_name() {
    let key: KeyPress = "MediaPlayPause".parse().unwrap();
    assert_eq!(key, KeyPress::new("MediaPlayPause"));
}

#[test]
fn test_parse_empty() {
    assert!("".parse::<KeyPress>().is_err());
}
