//! Canonical label handling (spec §3 MetricSeries, §4.4 label filters,
//! Design Notes "Dynamic typing surface").
//!
//! Labels are a schemaless `string -> string` map. Series identity depends
//! on a canonical, order-independent serialization of that map, so this is
//! the one piece of the dimensional model every other crate shares.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An ordered label map. Construction always sorts by key, so two maps
/// built from the same pairs in different orders compare and hash equal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(BTreeMap<String, String>);

impl LabelSet {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Stable, order-independent serialization used for series identity and
    /// hashing — keys are already sorted by `BTreeMap`'s iteration order.
    pub fn canonical_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", escape(k), escape(v)))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// A short, stable hash of the canonical string, used as the index
    /// lookup key in `metric_series.labels_hash` (spec §3).
    pub fn canonical_hash(&self) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.canonical_string().hash(&mut hasher);
        hasher.finish()
    }

    /// Does this label set satisfy a single equality conjunct? Keys absent
    /// from the conjunct are wildcarded (spec §4.4 label filter).
    pub fn matches_conjunct(&self, conjunct: &BTreeMap<String, String>) -> bool {
        conjunct.iter().all(|(k, v)| self.get(k) == Some(v.as_str()))
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('=', "\\=").replace(',', "\\,")
}

/// A list of equality conjuncts OR'd together (spec §4.4):
/// `[{k1: v1, k2: v2}, {k1: v3}]` ≡ `(k1=v1 ∧ k2=v2) ∨ (k1=v3)`.
/// An empty filter matches every series.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelFilter(pub Vec<BTreeMap<String, String>>);

impl LabelFilter {
    pub fn matches(&self, labels: &LabelSet) -> bool {
        self.0.is_empty() || self.0.iter().any(|conjunct| labels.matches_conjunct(conjunct))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalization_is_order_independent() {
        let a = LabelSet::from_pairs([("b", "2"), ("a", "1")]);
        let b = LabelSet::from_pairs([("a", "1"), ("b", "2")]);
        assert_eq!(a.canonical_string(), b.canonical_string());
        assert_eq!(a.canonical_hash(), b.canonical_hash());
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = LabelFilter::default();
        assert!(filter.matches(&LabelSet::new()));
        assert!(filter.matches(&LabelSet::from_pairs([("sensor", "CPU Temp")])));
    }

    #[test]
    fn filter_is_disjunction_of_conjunctions() {
        let mut c1 = BTreeMap::new();
        c1.insert("k1".to_string(), "v1".to_string());
        c1.insert("k2".to_string(), "v2".to_string());
        let mut c2 = BTreeMap::new();
        c2.insert("k1".to_string(), "v3".to_string());
        let filter = LabelFilter(vec![c1, c2]);

        assert!(filter.matches(&LabelSet::from_pairs([("k1", "v1"), ("k2", "v2")])));
        assert!(filter.matches(&LabelSet::from_pairs([("k1", "v3")])));
        assert!(!filter.matches(&LabelSet::from_pairs([("k1", "v1"), ("k2", "other")])));
    }

    #[test]
    fn unmentioned_keys_are_wildcarded() {
        let mut conjunct = BTreeMap::new();
        conjunct.insert("sensor".to_string(), "CPU Temp".to_string());
        let filter = LabelFilter(vec![conjunct]);
        assert!(filter.matches(&LabelSet::from_pairs([("sensor", "CPU Temp"), ("unit", "celsius")])));
    }
}
