//! # extbridge Orchestrator
//!
//! Runs an end-to-end assertion: observe state through the extension bridge,
//! act through the automation channel, wait, observe again, compare.
//!
//! ```text
//! Setup → Baseline → Act → Settle → Verify → Cleanup → {Passed, Failed}
//! ```
//!
//! Cleanup closes the automation channel on every path once setup succeeded.

mod error;
mod harness;
mod probe;
mod runner;
mod scenario;

pub use error::RunError;
pub use harness::{resolve_endpoint, Harness};
pub use probe::{ActiveTabProbe, Snapshot, StateProbe};
pub use runner::{Orchestrator, Phase, RunOutcome, RunReport};
pub use scenario::Scenario;
