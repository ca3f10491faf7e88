//! # extbridge Bridge
//!
//! Command/result exchange with a browser extension that can only poll.
//!
//! ```text
//! ┌──────────────┐ enqueue / take ┌──────────────┐  GET /get_command   ┌─────────────┐
//! │ BridgeClient │ ─────────────► │ BridgeState  │ ◄────────────────── │  extension  │
//! │ (test driver)│ ◄───────────── │ queue+results│ ◄────────────────── │  (poller)   │
//! └──────────────┘    notify      └──────────────┘  POST /post_response └─────────────┘
//! ```
//!
//! The driver never talks to the extension directly. Commands wait in a FIFO
//! queue until the extension claims them, results wait in a table until the
//! client that issued the command consumes them. Both sides only touch the
//! shared state through [`BridgeState`].

pub mod client;
pub mod error;
pub mod protocol;
pub mod routes;
pub mod server;
pub mod state;

pub use client::BridgeClient;
pub use error::BridgeError;
pub use protocol::{Command, CommandResult, ResultSubmission, SendCommandRequest, TabInfo};
pub use routes::create_router;
pub use server::{BridgeServer, BridgeServerHandle};
pub use state::{BridgeState, BridgeStats};
