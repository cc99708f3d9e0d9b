//! Query engine types: aggregation reducers and composite-query specs
//! (spec §4.4).

use rackwatch_core::labels::LabelFilter;
use rackwatch_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    None,
    Max,
    Min,
    Avg,
    Sum,
}

impl Aggregation {
    /// Reduces a set of `(series_id, value)` pairs from one tied group.
    /// `None` picks the smallest `series_id` deterministically (spec §4.4.1)
    /// rather than failing when more than one candidate ties.
    pub fn reduce(self, mut pairs: Vec<(i64, f64)>) -> Option<f64> {
        if pairs.is_empty() {
            return None;
        }
        match self {
            Aggregation::None => {
                pairs.sort_by_key(|(series_id, _)| *series_id);
                Some(pairs[0].1)
            }
            Aggregation::Max => pairs.iter().map(|(_, v)| *v).reduce(f64::max),
            Aggregation::Min => pairs.iter().map(|(_, v)| *v).reduce(f64::min),
            Aggregation::Sum => Some(pairs.iter().map(|(_, v)| *v).sum()),
            Aggregation::Avg => {
                let sum: f64 = pairs.iter().map(|(_, v)| *v).sum();
                Some(sum / pairs.len() as f64)
            }
        }
    }
}

/// One side of a `Fraction` query (spec §4.4.4) — shaped like the inputs
/// to `LatestValue` minus the `agent_id` (supplied separately).
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub metric_name: String,
    pub label_filter: LabelFilter,
    pub aggregation: Aggregation,
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type QueryResult<T> = Result<T, QueryError>;
