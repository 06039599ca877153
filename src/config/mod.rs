//! Configuration for the study-plan relay.
//!
//! Settings are layered in this order, later layers winning:
//! - built-in defaults
//! - `~/.studyplan/config` (JSON)
//! - environment variables
//!
//! No API key is required here: callers may bring their own per request.

mod builder;
mod constants;
mod defaults;
mod environment;
mod loader;
mod types;
mod validation;

pub use types::{AuthMode, Config, ProviderSettings};
