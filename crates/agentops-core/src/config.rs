//! Dashboard start-up configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::PageId;
use crate::visibility::PageVisibilityMap;

/// How a [`Dashboard`](crate::Dashboard) session starts.
///
/// The default is the built-in catalog with every page enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Catalog document to load instead of the built-in data.
    pub data_path: Option<PathBuf>,
    /// Pages that start disabled.
    #[serde(default)]
    pub disabled_pages: Vec<PageId>,
}

impl DashboardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    pub fn with_disabled(mut self, page: PageId) -> Self {
        if !self.disabled_pages.contains(&page) {
            self.disabled_pages.push(page);
        }
        self
    }

    /// The visibility map a new session starts from.
    pub fn initial_visibility(&self) -> PageVisibilityMap {
        let mut map = PageVisibilityMap::default();
        for page in &self.disabled_pages {
            map.set(*page, false);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_everything() {
        let config = DashboardConfig::new();
        assert!(config.data_path.is_none());
        assert_eq!(config.initial_visibility().enabled_count(), 9);
    }

    #[test]
    fn disabled_pages_start_off() {
        let config = DashboardConfig::new()
            .with_disabled(PageId::Azure)
            .with_disabled(PageId::Azure)
            .with_disabled(PageId::MultiCloud);
        assert_eq!(config.disabled_pages.len(), 2);
        let map = config.initial_visibility();
        assert!(!map.azure);
        assert!(!map.multi_cloud);
        assert_eq!(map.enabled_count(), 7);
    }
}
