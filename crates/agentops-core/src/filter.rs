//! Stable filtering of record collections by category and free-text query.

use std::collections::BTreeSet;

use crate::models::{Categorized, Record};

/// Category restriction plus a case-insensitive substring query.
///
/// `categories == None` means "any category"; `Some` of an empty set matches
/// nothing, which is what deselecting every toggle in a view means. An empty
/// query adds no restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter<C: Ord> {
    categories: Option<BTreeSet<C>>,
    query: String,
}

impl<C: Ord + Copy> RecordFilter<C> {
    /// A filter that keeps everything.
    pub fn new() -> Self {
        Self {
            categories: None,
            query: String::new(),
        }
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = C>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn categories(&self) -> Option<&BTreeSet<C>> {
        self.categories.as_ref()
    }

    /// The ordered subsequence of `records` this filter keeps.
    pub fn apply<'a, T>(&self, records: &'a [T]) -> Vec<&'a T>
    where
        T: Record + Categorized<Category = C>,
    {
        let needle = normalize(&self.query);
        records
            .iter()
            .filter(|r| match &self.categories {
                Some(active) => active.contains(&r.category()),
                None => true,
            })
            .filter(|r| needle.is_empty() || record_matches(*r, &needle))
            .collect()
    }
}

impl<C: Ord + Copy> Default for RecordFilter<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Records whose category is in `active`, in original order.
pub fn filter_by_category<'a, T>(records: &'a [T], active: &BTreeSet<T::Category>) -> Vec<&'a T>
where
    T: Categorized,
{
    records
        .iter()
        .filter(|r| active.contains(&r.category()))
        .collect()
}

/// Records with a search field containing `query` (case-insensitive).
/// An empty or blank query returns every record.
pub fn search<'a, T: Record>(records: &'a [T], query: &str) -> Vec<&'a T> {
    let needle = normalize(query);
    records
        .iter()
        .filter(|r| needle.is_empty() || record_matches(*r, &needle))
        .collect()
}

/// Looks a record up by id.
pub fn find_by_id<'a, T: Record>(records: &'a [T], id: &str) -> Option<&'a T> {
    records.iter().find(|r| r.id() == id)
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

fn record_matches<T: Record>(record: &T, needle: &str) -> bool {
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
    enum Level {
        Low,
        High,
    }

    struct Item {
        id: &'static str,
        text: &'static str,
        level: Level,
    }

    impl Record for Item {
        fn id(&self) -> &str {
            self.id
        }

        fn search_fields(&self) -> Vec<&str> {
            vec![self.text]
        }
    }

    impl Categorized for Item {
        type Category = Level;

        fn category(&self) -> Level {
            self.level
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item { id: "a", text: "Disk Full", level: Level::High },
            Item { id: "b", text: "disk ok", level: Level::Low },
            Item { id: "c", text: "cpu spike", level: Level::High },
        ]
    }

    fn ids(found: &[&Item]) -> Vec<&'static str> {
        found.iter().map(|i| i.id).collect()
    }

    #[test]
    fn default_filter_keeps_everything() {
        let data = items();
        assert_eq!(ids(&RecordFilter::new().apply(&data)), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_category_set_matches_nothing() {
        let data = items();
        let filter = RecordFilter::new().with_categories([]);
        assert!(filter.apply(&data).is_empty());
        assert!(filter_by_category(&data, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn category_and_query_combine() {
        let data = items();
        let filter = RecordFilter::new()
            .with_categories([Level::High])
            .with_query("DISK");
        assert_eq!(ids(&filter.apply(&data)), vec!["a"]);
    }

    #[test]
    fn blank_query_is_no_restriction() {
        let data = items();
        assert_eq!(search(&data, "   ").len(), 3);
        assert_eq!(ids(&search(&data, "Disk")), vec!["a", "b"]);
    }

    #[test]
    fn find_by_id_misses_cleanly() {
        let data = items();
        assert_eq!(find_by_id(&data, "c").map(|i| i.text), Some("cpu spike"));
        assert!(find_by_id(&data, "z").is_none());
    }
}
