//! Scheduler & lifecycle (spec §4.7): the combined retention/command-TTL
//! sweep ticker, and graceful-shutdown coordination shared by the server
//! binary's startup/shutdown sequencing.
//!
//! Startup order (spec §4.7): load config, open the datastore, ensure
//! schema, load or create the admin token and TLS material, start this
//! crate's [`sweeper::Sweeper`] on a background ticker, bind the listener,
//! accept requests — all owned by `rackwatch-server`'s `main`, which is
//! the natural place to construct every other crate's services in order.
//! Shutdown runs the same steps in reverse via [`shutdown::ShutdownCoordinator`].

pub mod shutdown;
pub mod sweeper;
pub mod types;

pub use shutdown::ShutdownCoordinator;
pub use sweeper::{RetentionPolicy, Sweeper};
pub use types::{LifecycleError, LifecycleResult, SweepReport};
