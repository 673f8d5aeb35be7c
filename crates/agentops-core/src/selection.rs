//! Small per-view selection state machines.
//!
//! Each view owns its own instances; none of them is shared with another view
//! or with the visibility store.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

/// Nothing selected, or exactly one value selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SingleSelection<T> {
    current: Option<T>,
}

impl<T: PartialEq> SingleSelection<T> {
    pub fn none() -> Self {
        Self { current: None }
    }

    pub fn with(value: T) -> Self {
        Self {
            current: Some(value),
        }
    }

    pub fn select(&mut self, value: T) {
        self.current = Some(value);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Selects `value`, or clears the selection if `value` is already selected.
    /// Expand/collapse rows behave this way.
    pub fn toggle(&mut self, value: T) {
        if self.current.as_ref() == Some(&value) {
            self.current = None;
        } else {
            self.current = Some(value);
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn is_selected(&self, value: &T) -> bool {
        self.current.as_ref() == Some(value)
    }
}

impl<T: PartialEq> Default for SingleSelection<T> {
    fn default() -> Self {
        Self::none()
    }
}

/// An arbitrary subset of some fixed universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleSet<T: Ord> {
    members: BTreeSet<T>,
}

impl<T: Ord> ToggleSet<T> {
    pub fn new() -> Self {
        Self {
            members: BTreeSet::new(),
        }
    }

    pub fn add(&mut self, value: T) {
        self.members.insert(value);
    }

    pub fn remove(&mut self, value: &T) {
        self.members.remove(value);
    }

    /// Removes `value` if present, adds it otherwise. Returns membership afterwards.
    pub fn toggle(&mut self, value: T) -> bool {
        if self.members.remove(&value) {
            false
        } else {
            self.members.insert(value);
            true
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.members.contains(value)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.members.iter()
    }

    pub fn as_set(&self) -> &BTreeSet<T> {
        &self.members
    }
}

impl<T: Ord> Default for ToggleSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for ToggleSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

/// Outcome of [`ComparisonSelection::select`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Added,
    AlreadySelected,
    Removed,
    /// Two ids were already selected; the new one was ignored.
    Full,
}

/// Up to two record ids picked for a side-by-side comparison, in pick order.
///
/// A third pick while two are held is ignored; the caller must deselect one
/// first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSelection {
    ids: Vec<String>,
}

impl ComparisonSelection {
    pub const CAPACITY: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: impl Into<String>) -> SelectOutcome {
        let id = id.into();
        if self.ids.contains(&id) {
            return SelectOutcome::AlreadySelected;
        }
        if self.ids.len() >= Self::CAPACITY {
            debug!(id = %id, "Comparison selection full, ignoring");
            return SelectOutcome::Full;
        }
        self.ids.push(id);
        SelectOutcome::Added
    }

    /// Returns `true` if `id` was selected.
    pub fn deselect(&mut self, id: &str) -> bool {
        let before = self.ids.len();
        self.ids.retain(|held| held != id);
        self.ids.len() != before
    }

    /// Deselects `id` if held, otherwise tries to select it.
    pub fn toggle(&mut self, id: impl Into<String>) -> SelectOutcome {
        let id = id.into();
        if self.deselect(&id) {
            return SelectOutcome::Removed;
        }
        self.select(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() == Self::CAPACITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_selection_transitions() {
        let mut sel = SingleSelection::none();
        assert!(sel.get().is_none());
        sel.select("trace-002");
        sel.select("trace-003");
        assert_eq!(sel.get(), Some(&"trace-003"));
        sel.clear();
        assert!(sel.get().is_none());
    }

    #[test]
    fn single_selection_toggle_collapses() {
        let mut expanded = SingleSelection::with(4);
        expanded.toggle(4);
        assert!(expanded.get().is_none());
        expanded.toggle(2);
        assert!(expanded.is_selected(&2));
    }

    #[test]
    fn toggle_set_is_an_involution() {
        let mut set: ToggleSet<u8> = [1, 2].into_iter().collect();
        assert!(!set.toggle(2));
        assert!(set.toggle(2));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        set.remove(&1);
        set.remove(&2);
        assert!(set.is_empty());
    }

    #[test]
    fn third_pick_is_ignored() {
        let mut sel = ComparisonSelection::new();
        assert_eq!(sel.select("a"), SelectOutcome::Added);
        assert_eq!(sel.select("b"), SelectOutcome::Added);
        assert_eq!(sel.select("c"), SelectOutcome::Full);
        assert_eq!(sel.ids(), ["a", "b"]);

        assert!(sel.deselect("a"));
        assert_eq!(sel.select("c"), SelectOutcome::Added);
        assert_eq!(sel.ids(), ["b", "c"]);
    }

    #[test]
    fn reselecting_is_not_a_duplicate() {
        let mut sel = ComparisonSelection::new();
        sel.select("a");
        assert_eq!(sel.select("a"), SelectOutcome::AlreadySelected);
        assert_eq!(sel.len(), 1);
        assert_eq!(sel.toggle("a"), SelectOutcome::Removed);
        assert!(sel.is_empty());
    }
}
