//! Single-pass aggregates over record collections.
//!
//! Nothing here caches: callers recompute from the source collection every
//! time a view is drawn.

use std::collections::BTreeMap;

/// Number of records per key, ordered by key.
pub fn count_by<T, K, F>(records: &[T], key: F) -> BTreeMap<K, usize>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(key(record)).or_insert(0) += 1;
    }
    counts
}

pub fn count_where<T, F>(records: &[T], predicate: F) -> usize
where
    F: Fn(&T) -> bool,
{
    records.iter().filter(|r| predicate(r)).count()
}

pub fn sum_by<T, F>(records: &[T], value: F) -> f64
where
    F: Fn(&T) -> f64,
{
    records.iter().map(value).sum()
}

/// Arithmetic mean, or `None` for an empty collection.
pub fn mean_by<T, F>(records: &[T], value: F) -> Option<f64>
where
    F: Fn(&T) -> f64,
{
    if records.is_empty() {
        return None;
    }
    Some(sum_by(records, value) / records.len() as f64)
}

/// Rounds to one decimal place, the precision dashboard cards display.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
