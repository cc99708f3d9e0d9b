//! Command plane (spec §4.6): reliable at-least-once-attempt delivery of
//! admin-originated commands to agents, with captured results.

pub mod metrics;
pub mod service;
pub mod types;

pub use service::CommandService;
pub use types::{CommandError, CommandResult};
