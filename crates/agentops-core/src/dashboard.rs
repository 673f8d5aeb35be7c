//! Composition root: one session's catalog, visibility store and view state.

use serde::Serialize;
use tracing::debug;

use crate::aggregate::{count_where, mean_by, round1};
use crate::catalog::Catalog;
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::models::{
    AgentStatus, AuditStatus, ClusterHealth, DeploymentStatus, HitlStatus, InsightKind,
    IntegrationStatus, PageId, Section, TraceStatus,
};
use crate::selection::SingleSelection;
use crate::views::{
    AzureView, CategoryView, GovernanceView, LogStreamView, MultiCloudView, PromptStudioView,
    TraceView,
};
use crate::visibility::VisibilityStore;

/// Headline counters of the dashboard landing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub active_agents: usize,
    pub pending_hitl_tasks: usize,
    pub blocked_audit_entries: usize,
    pub enabled_policies: usize,
    pub connected_integrations: usize,
    pub integration_events: u64,
    pub healthy_clusters: usize,
    pub total_clusters: usize,
    pub cloud_agents: u64,
    pub avg_eval_score: Option<f64>,
    pub error_traces: usize,
    pub degraded_deployments: usize,
}

#[derive(Debug)]
pub struct Dashboard {
    catalog: Catalog,
    pub visibility: VisibilityStore,
    pub active: SingleSelection<Section>,
    pub agents: CategoryView<AgentStatus>,
    pub insights: CategoryView<InsightKind>,
    pub hitl: CategoryView<HitlStatus>,
    pub integrations: CategoryView<IntegrationStatus>,
    pub logs: LogStreamView,
    pub traces: TraceView,
    pub governance: GovernanceView,
    pub prompts: PromptStudioView,
    pub multi_cloud: MultiCloudView,
    pub azure: AzureView,
}

impl Dashboard {
    /// Starts a session from `config`, loading the catalog it names.
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let catalog = match &config.data_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin()?,
        };
        let mut dashboard = Self::with_catalog(catalog);
        dashboard.visibility = VisibilityStore::with_initial(config.initial_visibility());
        Ok(dashboard)
    }

    /// A session over `catalog` with every page enabled.
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            visibility: VisibilityStore::new(),
            active: SingleSelection::with(Section::default()),
            agents: CategoryView::new(AgentStatus::ALL),
            insights: CategoryView::new(InsightKind::ALL),
            hitl: CategoryView::new(HitlStatus::ALL),
            integrations: CategoryView::new(IntegrationStatus::ALL),
            logs: LogStreamView::new(),
            traces: TraceView::new(&catalog.traces),
            governance: GovernanceView::new(&catalog.policies),
            prompts: PromptStudioView::new(),
            multi_cloud: MultiCloudView::new(),
            azure: AzureView::new(&catalog.aks_clusters),
            catalog,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn active_section(&self) -> Section {
        self.active.get().copied().unwrap_or_default()
    }

    /// Opens `section`. Disabled pages stay closed; returns whether it opened.
    pub fn open(&mut self, section: Section) -> bool {
        if let Section::Page(page) = section {
            if !self.visibility.is_enabled(page) {
                debug!(page = %page, "Ignoring navigation to disabled page");
                return false;
            }
        }
        self.active.select(section);
        true
    }

    /// Pages the navigation menu lists, in order.
    pub fn navigation(&self) -> Vec<PageId> {
        self.visibility.navigation()
    }

    /// Recomputed from the catalog and current view state on every call.
    pub fn summary(&self) -> DashboardSummary {
        let c = &self.catalog;
        DashboardSummary {
            active_agents: count_where(&c.agents, |a| a.status != AgentStatus::Idle),
            pending_hitl_tasks: count_where(&c.hitl_tasks, |t| t.status == HitlStatus::Pending),
            blocked_audit_entries: count_where(&c.audit_logs, |a| {
                a.status == AuditStatus::Blocked
            }),
            enabled_policies: self.governance.active_count(&c.policies),
            connected_integrations: count_where(&c.integrations, |i| {
                i.status == IntegrationStatus::Connected
            }),
            integration_events: c.integrations.iter().map(|i| i.events_processed).sum(),
            healthy_clusters: count_where(&c.clusters, |k| k.status == ClusterHealth::Healthy),
            total_clusters: c.clusters.len(),
            cloud_agents: c.cloud_providers.iter().map(|p| u64::from(p.agents)).sum(),
            avg_eval_score: mean_by(&c.clusters, |k| k.eval_score).map(round1),
            error_traces: count_where(&c.traces, |t| t.status == TraceStatus::Error),
            degraded_deployments: count_where(&c.deployments, |d| {
                d.status == DeploymentStatus::Degraded
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard() -> Dashboard {
        Dashboard::new(&DashboardConfig::new()).unwrap()
    }

    #[test]
    fn starts_on_the_dashboard_page() {
        let d = dashboard();
        assert_eq!(d.active_section(), Section::Page(PageId::Dashboard));
        assert_eq!(d.navigation().len(), 9);
        assert_eq!(d.traces.selected_trace.get().map(String::as_str), Some("trace-001"));
    }

    #[test]
    fn summary_counts_builtin_data() {
        let s = dashboard().summary();
        assert_eq!(s.active_agents, 5);
        assert_eq!(s.pending_hitl_tasks, 3);
        assert_eq!(s.blocked_audit_entries, 1);
        assert_eq!(s.enabled_policies, 5);
        assert_eq!(s.connected_integrations, 4);
        assert_eq!(s.integration_events, 97310);
        assert_eq!(s.healthy_clusters, 12);
        assert_eq!(s.total_clusters, 13);
        assert_eq!(s.cloud_agents, 479);
        assert_eq!(s.avg_eval_score, Some(91.3));
        assert_eq!(s.error_traces, 1);
        assert_eq!(s.degraded_deployments, 1);
    }

    #[test]
    fn summary_follows_policy_toggles() {
        let mut d = dashboard();
        d.governance.toggle_policy("1");
        d.governance.toggle_policy("2");
        assert_eq!(d.summary().enabled_policies, 3);
    }

    #[test]
    fn disabled_pages_cannot_be_opened() {
        let config = DashboardConfig::new().with_disabled(PageId::Azure);
        let mut d = Dashboard::new(&config).unwrap();
        assert!(!d.open(Section::Page(PageId::Azure)));
        assert_eq!(d.active_section(), Section::default());
        assert!(d.open(Section::Settings));
        assert_eq!(d.active_section().title(), "Settings");

        d.visibility.show_only(PageId::Prompts);
        d.visibility.restore_initial();
        assert!(!d.visibility.is_enabled(PageId::Azure));
        d.visibility.enable_all();
        assert!(d.open(Section::Page(PageId::Azure)));
    }

    #[test]
    fn session_reset_enables_configured_off_pages() {
        let config = DashboardConfig::new().with_disabled(PageId::Azure);
        let mut d = Dashboard::new(&config).unwrap();
        assert_eq!(d.visibility.enabled_count(), 8);
        d.visibility.reset();
        assert_eq!(d.visibility.enabled_count(), 9);
        assert!(d.visibility.is_enabled(PageId::Azure));
    }

    #[test]
    fn list_views_start_unfiltered() {
        let d = dashboard();
        let c = d.catalog();
        assert_eq!(d.agents.visible(&c.agents).len(), c.agents.len());
        assert_eq!(d.insights.visible(&c.insights).len(), 3);
        assert_eq!(d.hitl.visible(&c.hitl_tasks).len(), 5);
        assert_eq!(d.integrations.visible(&c.integrations).len(), 6);
    }

    #[test]
    fn view_state_is_independent_of_visibility() {
        let mut d = dashboard();
        d.logs.toggle_level(crate::models::LogLevel::Debug);
        d.visibility.toggle(PageId::Observability);
        assert_eq!(d.logs.levels.len(), 3);
        assert_eq!(d.visibility.enabled_count(), 8);
    }
}
