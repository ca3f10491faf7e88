use super::*;
use async_trait::async_trait;
use extbridge_bridge::BridgeError;
use extbridge_cdp::{ChannelError, KeyPress};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
struct FakeChannel {
    keys: Mutex<Vec<String>>,
    closes: AtomicUsize,
    fail_calls: bool,
    fail_close: bool,
}

#[async_trait]
impl AutomationChannel for FakeChannel {
    async fn call(&self, method: &str, params: Value) -> Result<Value, ChannelError> {
        if self.fail_calls {
            return Err(ChannelError::Protocol {
                method: method.to_string(),
                reason: "connection closed before reply".to_string(),
            });
        }
        if params["type"] == "keyDown" {
            let key = params["key"].as_str().unwrap_or_default().to_string();
            self.keys.lock().unwrap().push(key);
        }
        Ok(json!({}))
    }

    async fn close(&self) -> Result<(), ChannelError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(ChannelError::Closed);
        }
        Ok(())
    }
}

struct ScriptedProbe {
    answers: Mutex<VecDeque<Result<Snapshot, BridgeError>>>,
}

impl ScriptedProbe {
    fn new(answers: Vec<Result<Snapshot, BridgeError>>) -> Self {
        Self {
            answers: Mutex::new(answers.into()),
        }
    }

    fn remaining(&self) -> usize {
        self.answers.lock().unwrap().len()
    }
}

#[async_trait]
impl StateProbe for ScriptedProbe {
    async fn snapshot(&self) -> Result<Snapshot, BridgeError> {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .expect("probe queried more often than scripted")
    }
}

fn tab(id: &str, title: &str) -> Result<Snapshot, BridgeError> {
    Ok(Snapshot::new(id, title))
}

fn timeout() -> Result<Snapshot, BridgeError> {
    Err(BridgeError::Timeout {
        command: "get_active_tab".to_string(),
        timeout: Duration::from_secs(5),
    })
}

fn fast_scenario() -> Scenario {
    let mut scenario = Scenario::tab_switch();
    scenario.key_interval = Duration::from_millis(1);
    scenario.settle = Duration::from_millis(1);
    scenario
}

#[tokio::test]
async fn test_passes_when_state_changes() {
    let channel = FakeChannel::default();
    let probe = ScriptedProbe::new(vec![tab("1", "Google"), tab("2", "GitHub")]);

    let report = Orchestrator::new(&channel, &probe).run(&fast_scenario()).await;

    assert!(report.passed());
    assert_eq!(report.exit_code(), 0);
    match &report.outcome {
        RunOutcome::Passed { explanation } => {
            assert!(explanation.contains("Google"));
            assert!(explanation.contains("GitHub"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(
        report.phases,
        [Phase::Baseline, Phase::Act, Phase::Settle, Phase::Verify, Phase::Cleanup]
    );
    assert_eq!(*channel.keys.lock().unwrap(), ["t", "ArrowDown", "Enter"]);
    assert_eq!(channel.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fails_when_state_unchanged() {
    let channel = FakeChannel::default();
    let probe = ScriptedProbe::new(vec![tab("1", "Google"), tab("1", "Google")]);

    let report = Orchestrator::new(&channel, &probe).run(&fast_scenario()).await;

    assert_eq!(report.exit_code(), 1);
    match &report.outcome {
        RunOutcome::Failed { phase, explanation } => {
            assert_eq!(*phase, Phase::Verify);
            assert!(explanation.contains("state did not change"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(channel.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_baseline_failure_skips_action_and_cleans_up() {
    let channel = FakeChannel::default();
    let probe = ScriptedProbe::new(vec![timeout(), tab("2", "never read")]);

    let report = Orchestrator::new(&channel, &probe).run(&fast_scenario()).await;

    match &report.outcome {
        RunOutcome::Failed { phase, explanation } => {
            assert_eq!(*phase, Phase::Baseline);
            assert!(explanation.contains("Baseline unavailable"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(report.phases, [Phase::Baseline, Phase::Cleanup]);
    assert!(channel.keys.lock().unwrap().is_empty());
    assert_eq!(probe.remaining(), 1);
    assert_eq!(channel.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_verify_failure_cleans_up() {
    let channel = FakeChannel::default();
    let probe = ScriptedProbe::new(vec![tab("1", "Google"), timeout()]);

    let report = Orchestrator::new(&channel, &probe).run(&fast_scenario()).await;

    match &report.outcome {
        RunOutcome::Failed { phase, .. } => assert_eq!(*phase, Phase::Verify),
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(report.phases.last(), Some(&Phase::Cleanup));
    assert_eq!(channel.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_action_failure_cleans_up() {
    let channel = FakeChannel {
        fail_calls: true,
        ..Default::default()
    };
    let probe = ScriptedProbe::new(vec![tab("1", "Google")]);

    let report = Orchestrator::new(&channel, &probe).run(&fast_scenario()).await;

    match &report.outcome {
        RunOutcome::Failed { phase, explanation } => {
            assert_eq!(*phase, Phase::Act);
            assert!(explanation.contains("Input.dispatchKeyEvent"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(report.phases, [Phase::Baseline, Phase::Act, Phase::Cleanup]);
    assert_eq!(channel.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_close_error_keeps_verdict() {
    let channel = FakeChannel {
        fail_close: true,
        ..Default::default()
    };
    let probe = ScriptedProbe::new(vec![tab("1", "A"), tab("2", "B")]);

    let report = Orchestrator::new(&channel, &probe).run(&fast_scenario()).await;

    assert!(report.passed());
    assert_eq!(channel.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_waits_between_keys_and_settles() {
    let channel = FakeChannel::default();
    let probe = ScriptedProbe::new(vec![tab("1", "A"), tab("2", "B")]);
    let scenario = Scenario::new(
        "timed",
        vec![KeyPress::new("a"), KeyPress::new("b"), KeyPress::new("c")],
    );

    let start = tokio::time::Instant::now();
    Orchestrator::new(&channel, &probe).run(&scenario).await;

    // Two gaps between three presses, then the settle interval.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(500 * 2 + 1000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(500 * 2 + 1000 + 50), "{elapsed:?}");
}

#[test]
fn test_outcome_serializes_with_status() {
    let outcome = RunOutcome::Failed {
        phase: Phase::Verify,
        explanation: "state did not change".to_string(),
    };
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["status"], "failed");
    assert_eq!(value["phase"], "Verify");
}
