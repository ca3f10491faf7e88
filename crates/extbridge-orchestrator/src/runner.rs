//! The run state machine.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use extbridge_cdp::AutomationChannel;

use crate::error::RunError;
use crate::probe::{Snapshot, StateProbe};
use crate::scenario::Scenario;

/// Non-terminal run phases, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Setup,
    Baseline,
    Act,
    Settle,
    Verify,
    Cleanup,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Setup => "setup",
            Phase::Baseline => "baseline",
            Phase::Act => "act",
            Phase::Settle => "settle",
            Phase::Verify => "verify",
            Phase::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RunOutcome {
    Passed { explanation: String },
    Failed { phase: Phase, explanation: String },
}

/// What happened during a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub scenario: String,
    pub outcome: RunOutcome,
    /// Phases entered, in order. Never repeats.
    pub phases: Vec<Phase>,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, RunOutcome::Passed { .. })
    }

    /// 0 when passed, 1 when failed.
    pub fn exit_code(&self) -> i32 {
        if self.passed() { 0 } else { 1 }
    }
}

/// Drives one scenario against a channel and a probe.
pub struct Orchestrator<'a> {
    channel: &'a dyn AutomationChannel,
    probe: &'a dyn StateProbe,
}

impl<'a> Orchestrator<'a> {
    pub fn new(channel: &'a dyn AutomationChannel, probe: &'a dyn StateProbe) -> Self {
        Self { channel, probe }
    }

    /// Run from Baseline through Cleanup. The channel is closed exactly once,
    /// whatever the outcome.
    pub async fn run(&self, scenario: &Scenario) -> RunReport {
        let mut phases = Vec::new();
        let outcome = match self.drive(scenario, &mut phases).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(phase = %e.phase(), "run aborted: {}", e);
                RunOutcome::Failed {
                    phase: e.phase(),
                    explanation: e.to_string(),
                }
            }
        };

        Self::enter(&mut phases, Phase::Cleanup);
        if let Err(e) = self.channel.close().await {
            warn!("closing automation channel failed: {}", e);
        }

        match &outcome {
            RunOutcome::Passed { explanation } => {
                info!(scenario = %scenario.name, "PASSED: {}", explanation)
            }
            RunOutcome::Failed { phase, explanation } => {
                info!(scenario = %scenario.name, %phase, "FAILED: {}", explanation)
            }
        }

        RunReport {
            scenario: scenario.name.clone(),
            outcome,
            phases,
        }
    }

    async fn drive(
        &self,
        scenario: &Scenario,
        phases: &mut Vec<Phase>,
    ) -> Result<RunOutcome, RunError> {
        Self::enter(phases, Phase::Baseline);
        let before = self
            .probe
            .snapshot()
            .await
            .map_err(RunError::BaselineUnavailable)?;
        info!(id = %before.id, "baseline: {}", before.label);

        Self::enter(phases, Phase::Act);
        for (i, key) in scenario.keys.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(scenario.key_interval).await;
            }
            info!("sending {}", key);
            self.channel
                .send_key_press(key)
                .await
                .map_err(RunError::Action)?;
        }

        Self::enter(phases, Phase::Settle);
        tokio::time::sleep(scenario.settle).await;

        Self::enter(phases, Phase::Verify);
        let after = self.probe.snapshot().await.map_err(RunError::Verify)?;
        info!(id = %after.id, "after: {}", after.label);

        Ok(Self::compare(&before, &after))
    }

    fn compare(before: &Snapshot, after: &Snapshot) -> RunOutcome {
        if before.id != after.id {
            RunOutcome::Passed {
                explanation: format!("state changed from '{}' to '{}'", before.label, after.label),
            }
        } else {
            RunOutcome::Failed {
                phase: Phase::Verify,
                explanation: format!("state did not change (still '{}')", before.label),
            }
        }
    }

    fn enter(phases: &mut Vec<Phase>, phase: Phase) {
        info!(%phase, "entering phase");
        phases.push(phase);
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
