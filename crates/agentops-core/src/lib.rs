//! agentops-core: navigation visibility, datasets and derived views of the
//! AgentOps dashboard.
//!
//! Everything is in-memory and single-threaded. The [`Dashboard`] owns one
//! session's state; views recompute their projections from the [`Catalog`]
//! on every call.

pub mod aggregate;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod models;
pub mod selection;
pub mod views;
pub mod visibility;

pub use catalog::Catalog;
pub use compare::{compare_pair, compare_selected, Comparison, ComparisonRow, Direction, Slot};
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardSummary};
pub use error::{AgentOpsError, Result};
pub use filter::RecordFilter;
pub use models::{PageId, Section};
pub use selection::{ComparisonSelection, SelectOutcome, SingleSelection, ToggleSet};
pub use visibility::{PageVisibilityMap, SubscriptionId, VisibilityStore};
