//! Chrome DevTools Protocol automation channel.
//!
//! ```text
//! ┌─────────────────┐    WebSocket     ┌──────────────────┐
//! │   CdpChannel    │ ◄──────────────► │   Chrome page    │
//! │  (one request   │       CDP        │  target          │
//! │   in flight)    │                  │                  │
//! └─────────────────┘                  └──────────────────┘
//! ```
//!
//! Start Chrome with remote debugging enabled:
//!
//! ```bash
//! google-chrome --remote-debugging-port=9222
//! ```
//!
//! then either pass a page's `webSocketDebuggerUrl` directly or look one up
//! with [`discovery::resolve_page_url`].

mod channel;
pub mod discovery;
mod error;
mod keys;
mod protocol;

pub use channel::{AutomationChannel, CdpChannel};
pub use error::ChannelError;
pub use keys::{EmptyKeyName, KeyPress};
pub use protocol::*;
