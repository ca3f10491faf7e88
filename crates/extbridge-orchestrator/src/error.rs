//! Run-level errors.

use thiserror::Error;

use extbridge_bridge::BridgeError;
use extbridge_cdp::ChannelError;

use crate::runner::Phase;

/// Why a run could not reach a verdict.
#[derive(Debug, Error)]
pub enum RunError {
    /// The bridge server could not be started.
    #[error("Bridge server failed to start: {0}")]
    BridgeStartup(#[source] BridgeError),

    /// The automation channel could not be established.
    #[error("Automation channel setup failed: {0}")]
    Connect(#[source] ChannelError),

    /// The state before acting could not be observed.
    #[error("Baseline unavailable: {0}")]
    BaselineUnavailable(#[source] BridgeError),

    /// An automation request failed while acting.
    #[error("Action failed: {0}")]
    Action(#[source] ChannelError),

    /// The state after acting could not be observed.
    #[error("Verification query failed: {0}")]
    Verify(#[source] BridgeError),
}

impl RunError {
    /// The phase that raised the error.
    pub fn phase(&self) -> Phase {
        match self {
            RunError::BridgeStartup(_) | RunError::Connect(_) => Phase::Setup,
            RunError::BaselineUnavailable(_) => Phase::Baseline,
            RunError::Action(_) => Phase::Act,
            RunError::Verify(_) => Phase::Verify,
        }
    }

    /// Setup errors mean no test ran at all.
    pub fn is_fatal(&self) -> bool {
        self.phase() == Phase::Setup
    }
}
