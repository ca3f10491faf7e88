//! # extbridge Config
//!
//! Configuration for the bridge server, the DevTools automation channel and
//! the end-to-end scenario timings.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
