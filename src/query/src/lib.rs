//! Query engine (spec §4.4): latest-value, timeseries, rate, and
//! composite-fraction reads over the series catalog.

pub mod engine;
pub mod metrics;
pub mod types;

pub use engine::QueryService;
pub use types::{Aggregation, QueryError, QueryResult, QuerySpec};
