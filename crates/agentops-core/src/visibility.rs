//! Navigation visibility store.
//!
//! The map always holds exactly one flag per [`PageId`]; the store owns it for
//! the lifetime of a session and publishes every change to its subscribers.
//! Nothing here is persisted, so a new store always starts from the defaults.
//!
//! The store is single-threaded: listeners are plain `Fn` boxes and every
//! operation completes synchronously before the next one starts.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::PageId;

/// Which pages are enabled for navigation. Every page key is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PageVisibilityMap {
    pub dashboard: bool,
    pub observability: bool,
    pub insights_tower: bool,
    pub evaluation: bool,
    pub prompts: bool,
    pub governance: bool,
    pub azure: bool,
    pub multi_cloud: bool,
    pub integrations: bool,
}

impl PageVisibilityMap {
    /// A map with every page set to `value`.
    pub fn uniform(value: bool) -> Self {
        Self {
            dashboard: value,
            observability: value,
            insights_tower: value,
            evaluation: value,
            prompts: value,
            governance: value,
            azure: value,
            multi_cloud: value,
            integrations: value,
        }
    }

    pub fn get(&self, page: PageId) -> bool {
        match page {
            PageId::Dashboard => self.dashboard,
            PageId::Observability => self.observability,
            PageId::InsightsTower => self.insights_tower,
            PageId::Evaluation => self.evaluation,
            PageId::Prompts => self.prompts,
            PageId::Governance => self.governance,
            PageId::Azure => self.azure,
            PageId::MultiCloud => self.multi_cloud,
            PageId::Integrations => self.integrations,
        }
    }

    pub fn set(&mut self, page: PageId, value: bool) {
        *self.slot(page) = value;
    }

    fn slot(&mut self, page: PageId) -> &mut bool {
        match page {
            PageId::Dashboard => &mut self.dashboard,
            PageId::Observability => &mut self.observability,
            PageId::InsightsTower => &mut self.insights_tower,
            PageId::Evaluation => &mut self.evaluation,
            PageId::Prompts => &mut self.prompts,
            PageId::Governance => &mut self.governance,
            PageId::Azure => &mut self.azure,
            PageId::MultiCloud => &mut self.multi_cloud,
            PageId::Integrations => &mut self.integrations,
        }
    }

    /// Pages paired with their flag, in navigation order.
    pub fn iter(&self) -> impl Iterator<Item = (PageId, bool)> + '_ {
        PageId::ALL.iter().map(move |&page| (page, self.get(page)))
    }

    pub fn enabled_count(&self) -> usize {
        self.iter().filter(|(_, enabled)| *enabled).count()
    }

    /// Enabled pages in navigation order.
    pub fn enabled_pages(&self) -> Vec<PageId> {
        self.iter()
            .filter_map(|(page, enabled)| enabled.then_some(page))
            .collect()
    }
}

impl Default for PageVisibilityMap {
    fn default() -> Self {
        Self::uniform(true)
    }
}

/// Handle returned by [`VisibilityStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&PageVisibilityMap)>;

/// Owner of the session's [`PageVisibilityMap`].
pub struct VisibilityStore {
    map: PageVisibilityMap,
    initial: PageVisibilityMap,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl VisibilityStore {
    /// A store with every page enabled.
    pub fn new() -> Self {
        Self::with_initial(PageVisibilityMap::default())
    }

    /// A store starting from `initial`; [`restore_initial`](Self::restore_initial)
    /// returns here.
    pub fn with_initial(initial: PageVisibilityMap) -> Self {
        Self {
            map: initial,
            initial,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn visibility(&self) -> PageVisibilityMap {
        self.map
    }

    pub fn is_enabled(&self, page: PageId) -> bool {
        self.map.get(page)
    }

    /// Number of enabled pages, computed from the map on every call.
    pub fn enabled_count(&self) -> usize {
        self.map.enabled_count()
    }

    /// Pages a navigation menu should show.
    pub fn navigation(&self) -> Vec<PageId> {
        self.map.enabled_pages()
    }

    pub fn toggle(&mut self, page: PageId) {
        let value = !self.map.get(page);
        self.set(page, value);
    }

    /// Sets one flag. Setting a flag to its current value is a no-op.
    pub fn set(&mut self, page: PageId, value: bool) {
        let mut next = self.map;
        next.set(page, value);
        self.replace(next);
    }

    pub fn enable_all(&mut self) {
        self.replace(PageVisibilityMap::uniform(true));
    }

    /// Enables `page` and disables every other page.
    pub fn show_only(&mut self, page: PageId) {
        let mut next = PageVisibilityMap::uniform(false);
        next.set(page, true);
        self.replace(next);
    }

    /// Session end: every page enabled again.
    pub fn reset(&mut self) {
        self.replace(PageVisibilityMap::default());
    }

    /// Restores the map the store was created with.
    pub fn restore_initial(&mut self) {
        self.replace(self.initial);
    }

    /// Registers a listener called with the new map after every change.
    pub fn subscribe(&mut self, listener: impl Fn(&PageVisibilityMap) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    fn replace(&mut self, next: PageVisibilityMap) {
        if next == self.map {
            return;
        }
        self.map = next;
        debug!(
            enabled = self.map.enabled_count(),
            listeners = self.listeners.len(),
            "Page visibility changed"
        );
        for (_, listener) in &self.listeners {
            listener(&self.map);
        }
    }
}

impl Default for VisibilityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VisibilityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityStore")
            .field("map", &self.map)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
