//! Pairwise metric comparison between two records of one collection.
//!
//! Each metric declares which direction is better. The signed difference is
//! oriented so that a positive value always favours the first record:
//! `first - second` when higher is better, `second - first` when lower is
//! better (cost-like metrics).

use serde::Serialize;

use crate::filter::find_by_id;
use crate::models::{PromptVersion, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// One comparable metric of a record type.
pub struct MetricSpec<T> {
    pub label: &'static str,
    pub direction: Direction,
    pub value: fn(&T) -> f64,
}

/// Record types that can be shown side by side.
pub trait Comparable: Record + Sized + 'static {
    const COMPARISON_METRICS: &'static [MetricSpec<Self>];
}

impl Comparable for PromptVersion {
    const COMPARISON_METRICS: &'static [MetricSpec<Self>] = &[
        MetricSpec {
            label: "Accuracy",
            direction: Direction::HigherIsBetter,
            value: |p| p.accuracy,
        },
        MetricSpec {
            label: "Evaluations",
            direction: Direction::HigherIsBetter,
            value: |p| p.evaluations as f64,
        },
        MetricSpec {
            label: "Token Usage",
            direction: Direction::LowerIsBetter,
            value: |p| p.token_usage as f64,
        },
        MetricSpec {
            label: "Response Time",
            direction: Direction::LowerIsBetter,
            value: |p| p.response_time_s,
        },
        MetricSpec {
            label: "Cost",
            direction: Direction::LowerIsBetter,
            value: |p| p.cost_per_request,
        },
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub metric: &'static str,
    pub direction: Direction,
    pub first: f64,
    pub second: f64,
    pub diff: f64,
}

/// Resolution of one selected id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "id", rename_all = "snake_case")]
pub enum Slot {
    Empty,
    Found(String),
    NotFound(String),
}

impl Slot {
    pub fn is_found(&self) -> bool {
        matches!(self, Slot::Found(_))
    }
}

/// Result of comparing a selection. `rows` is empty unless both slots resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub first: Slot,
    pub second: Slot,
    pub rows: Vec<ComparisonRow>,
}

impl Comparison {
    pub fn is_complete(&self) -> bool {
        !self.rows.is_empty()
    }

    /// Ids that were selected but are not in the collection.
    pub fn missing(&self) -> Vec<&str> {
        [&self.first, &self.second]
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::NotFound(id) => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn row(&self, metric: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.metric == metric)
    }
}

/// Metric rows for two records, first vs second.
pub fn compare_pair<T: Comparable>(first: &T, second: &T) -> Vec<ComparisonRow> {
    T::COMPARISON_METRICS
        .iter()
        .map(|spec| {
            let a = (spec.value)(first);
            let b = (spec.value)(second);
            let diff = match spec.direction {
                Direction::HigherIsBetter => a - b,
                Direction::LowerIsBetter => b - a,
            };
            ComparisonRow {
                metric: spec.label,
                direction: spec.direction,
                first: a,
                second: b,
                diff,
            }
        })
        .collect()
}

/// Compares the records named by `selected` (first two ids, in order).
///
/// Fewer than two ids, or an id that is not in `records`, yields no rows.
pub fn compare_selected<T: Comparable>(records: &[T], selected: &[String]) -> Comparison {
    let (first, a) = resolve(records, selected, 0);
    let (second, b) = resolve(records, selected, 1);
    let rows = match (a, b) {
        (Some(a), Some(b)) => compare_pair(a, b),
        _ => Vec::new(),
    };
    Comparison { first, second, rows }
}

fn resolve<'a, T: Record>(records: &'a [T], selected: &[String], idx: usize) -> (Slot, Option<&'a T>) {
    match selected.get(idx) {
        None => (Slot::Empty, None),
        Some(id) => match find_by_id(records, id) {
            Some(record) => (Slot::Found(id.clone()), Some(record)),
            None => (Slot::NotFound(id.clone()), None),
        },
    }
}
