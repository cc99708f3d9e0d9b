//! Agent-side runtime (spec §4.1/§4.2/§4.5/§4.6 agent halves): keypair
//! and bearer-token persistence, metrics collection, log shipping with
//! per-source cursors, command polling/execution, and the push client
//! that ties them to the server's HTTP API.

pub mod backoff;
pub mod collector;
pub mod commands;
pub mod keystore;
pub mod log_sources;
pub mod metrics;
pub mod push_client;
pub mod runtime;
pub mod types;

pub use commands::CommandExecutor;
pub use keystore::Keystore;
pub use push_client::PushClient;
pub use runtime::AgentRuntime;
pub use types::{AgentRuntimeError, AgentRuntimeResult};
