//! Storage & retention (spec §3, §4.3): the relational schema, series
//! catalog, dual-path point tables, log/command persistence, and the
//! age-based retention sweep. Everything lives behind one SQLite file
//! (spec §2 Non-goals: no distributed storage, one process per datastore).

pub mod agents;
pub mod commands;
pub mod db;
pub mod integration;
pub mod logs;
pub mod metrics;
pub mod points;
pub mod retention;
pub mod schema;
pub mod series;
pub mod types;

pub use db::Store;
pub use integration::{StorageHandle, StorageStats};
pub use retention::RetentionReport;
pub use types::{
    Agent, Command, CommandStatus, LogEntry, LogSource, MetricPoint, MetricSeries, StorageError,
    StorageResult, ValueKind,
};
