//! `metrics` counters for the query engine (spec §7 observability).

pub fn record_query(kind: &'static str) {
    metrics::counter!("rackwatch_queries_total", "kind" => kind).increment(1);
}
