//! Query engine (spec §4.4): latest-value, timeseries, rate, and
//! composite-fraction reads over the series catalog.
//!
//! Every query batches one SQL statement per physical point table and
//! reduces in memory — no per-row round-trips (spec §4.4 performance
//! contract).

use std::collections::BTreeMap;

use rackwatch_core::labels::LabelFilter;
use rackwatch_storage::{MetricSeries, StorageHandle};

use crate::metrics;
use crate::types::{Aggregation, QueryResult, QuerySpec};

#[derive(Clone)]
pub struct QueryService {
    store: StorageHandle,
}

impl QueryService {
    pub fn new(store: StorageHandle) -> Self {
        Self { store }
    }

    async fn candidate_series(
        &self,
        metric_name: &str,
        agent_ids: Option<&[String]>,
        label_filter: &LabelFilter,
    ) -> QueryResult<Vec<MetricSeries>> {
        let all = self.store.list_series_by_name(metric_name).await?;
        Ok(all
            .into_iter()
            .filter(|s| agent_ids.map_or(true, |ids| ids.iter().any(|id| id == &s.agent_id)))
            .filter(|s| label_filter.matches(&s.labels))
            .collect())
    }

    /// §4.4.1.
    pub async fn latest_value(
        &self,
        agent_id: &str,
        metric_name: &str,
        label_filter: &LabelFilter,
        aggregation: Aggregation,
    ) -> QueryResult<Option<f64>> {
        metrics::record_query("latest_value");
        let candidates = self
            .candidate_series(metric_name, Some(std::slice::from_ref(&agent_id.to_string())), label_filter)
            .await?;

        let mut latest: Vec<(i64, i64, f64)> = Vec::new();
        for series in &candidates {
            if let Some((ts, value)) = self.store.latest_point(series.series_id, series.value_kind).await? {
                latest.push((series.series_id, ts, value));
            }
        }

        let Some(max_ts) = latest.iter().map(|(_, ts, _)| *ts).max() else {
            return Ok(None);
        };
        let tied: Vec<(i64, f64)> = latest
            .into_iter()
            .filter(|(_, ts, _)| *ts == max_ts)
            .map(|(sid, _, v)| (sid, v))
            .collect();

        Ok(aggregation.reduce(tied))
    }

    /// §4.4.2.
    pub async fn timeseries(
        &self,
        metric_name: &str,
        start: i64,
        end: i64,
        agent_ids: Option<&[String]>,
        label_filter: &LabelFilter,
        aggregation: Aggregation,
        step: Option<i64>,
    ) -> QueryResult<BTreeMap<String, Vec<(i64, f64)>>> {
        metrics::record_query("timeseries");
        let candidates = self.candidate_series(metric_name, agent_ids, label_filter).await?;

        let mut groups: BTreeMap<(String, i64), Vec<(i64, f64)>> = BTreeMap::new();
        for series in &candidates {
            let points = self.store.points_in_range(series.series_id, series.value_kind, start, end).await?;
            for (ts, value) in points {
                let bucket_ts = match step {
                    Some(s) if s > 0 => (ts / s) * s,
                    _ => ts,
                };
                groups
                    .entry((series.agent_id.clone(), bucket_ts))
                    .or_default()
                    .push((series.series_id, value));
            }
        }

        let mut per_agent: BTreeMap<String, Vec<(i64, f64)>> = BTreeMap::new();
        for ((agent_id, ts), pairs) in groups {
            if let Some(value) = aggregation.reduce(pairs) {
                per_agent.entry(agent_id).or_default().push((ts, value));
            }
        }
        for series in per_agent.values_mut() {
            series.sort_by_key(|(ts, _)| *ts);
        }

        Ok(per_agent)
    }

    /// §4.4.3. Counter rate over a sliding window; a reset (last < first)
    /// within the window reports 0 rather than a negative rate.
    pub async fn rate(
        &self,
        metric_name: &str,
        start: i64,
        end: i64,
        agent_ids: Option<&[String]>,
        label_filter: &LabelFilter,
        window_sec: i64,
        aggregation: Aggregation,
    ) -> QueryResult<BTreeMap<String, Vec<(i64, f64)>>> {
        metrics::record_query("rate");
        let candidates = self.candidate_series(metric_name, agent_ids, label_filter).await?;

        let mut groups: BTreeMap<(String, i64), Vec<(i64, f64)>> = BTreeMap::new();
        for series in &candidates {
            let points = self
                .store
                .points_in_range(series.series_id, series.value_kind, start - window_sec, end)
                .await?;

            for (i, &(ts_last, value_last)) in points.iter().enumerate() {
                if ts_last < start || ts_last > end {
                    continue;
                }
                let window_start = ts_last - window_sec;
                let Some(&(ts_first, value_first)) = points[..=i].iter().find(|(ts, _)| *ts >= window_start) else {
                    continue;
                };
                if ts_first == ts_last {
                    continue;
                }
                let rate = if value_last >= value_first {
                    (value_last - value_first) / (ts_last - ts_first) as f64
                } else {
                    0.0
                };
                groups.entry((series.agent_id.clone(), ts_last)).or_default().push((series.series_id, rate));
            }
        }

        let mut per_agent: BTreeMap<String, Vec<(i64, f64)>> = BTreeMap::new();
        for ((agent_id, ts), pairs) in groups {
            if let Some(value) = aggregation.reduce(pairs) {
                per_agent.entry(agent_id).or_default().push((ts, value));
            }
        }
        for series in per_agent.values_mut() {
            series.sort_by_key(|(ts, _)| *ts);
        }

        Ok(per_agent)
    }

    /// §4.4.4.
    pub async fn fraction(
        &self,
        agent_id: &str,
        numerator: &QuerySpec,
        denominator: &QuerySpec,
        multiplier: f64,
    ) -> QueryResult<Option<f64>> {
        metrics::record_query("fraction");
        let num = self
            .latest_value(agent_id, &numerator.metric_name, &numerator.label_filter, numerator.aggregation)
            .await?;
        let den = self
            .latest_value(agent_id, &denominator.metric_name, &denominator.label_filter, denominator.aggregation)
            .await?;

        match (num, den) {
            (Some(_), Some(den)) if den == 0.0 => Ok(None),
            (Some(num), Some(den)) => Ok(Some((num / den) * multiplier)),
            _ => Ok(None),
        }
    }
}
