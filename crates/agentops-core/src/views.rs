//! Per-view UI state and the derived data each view draws.
//!
//! A view holds only its own selection state; the records come from the
//! [`Catalog`](crate::Catalog) and are passed in on every call.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::aggregate::{count_by, count_where, mean_by, round1};
use crate::compare::{compare_selected, Comparison};
use crate::filter::{find_by_id, search, RecordFilter};
use crate::models::{
    AgentDeployment, AksCluster, AksStatus, AuditLog, AuditStatus, AzureTab, Categorized,
    CloudCluster, ClusterHealth, DeploymentStatus, LogEntry, LogLevel, MultiCloudTab, Policy,
    PolicyKind, PromptStatus, PromptVersion, Provider, Record, Span, Trace,
};
use crate::selection::{ComparisonSelection, SelectOutcome, SingleSelection, ToggleSet};

// ─── Log stream ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LogStreamView {
    pub levels: ToggleSet<LogLevel>,
    pub expanded: SingleSelection<String>,
    pub query: String,
}

impl LogStreamView {
    /// Every level active, nothing expanded.
    pub fn new() -> Self {
        Self {
            levels: LogLevel::ALL.iter().copied().collect(),
            expanded: SingleSelection::none(),
            query: String::new(),
        }
    }

    /// Returns whether `level` is active afterwards.
    pub fn toggle_level(&mut self, level: LogLevel) -> bool {
        self.levels.toggle(level)
    }

    pub fn toggle_expanded(&mut self, log_id: &str) {
        self.expanded.toggle(log_id.to_string());
    }

    pub fn filter(&self) -> RecordFilter<LogLevel> {
        RecordFilter::new()
            .with_categories(self.levels.iter().copied())
            .with_query(self.query.as_str())
    }

    pub fn visible<'a>(&self, logs: &'a [LogEntry]) -> Vec<&'a LogEntry> {
        self.filter().apply(logs)
    }

    /// Entries per level over the whole stream, regardless of toggles.
    pub fn level_counts(logs: &[LogEntry]) -> BTreeMap<LogLevel, usize> {
        count_by(logs, |l| l.level)
    }
}

impl Default for LogStreamView {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Category lists ──────────────────────────────────────────────────────────

/// Status toggles plus a search box over one collection. Backs the agent
/// cards, insight feed, HITL queue and integration list.
#[derive(Debug, Clone)]
pub struct CategoryView<C: Ord> {
    pub categories: ToggleSet<C>,
    pub query: String,
}

impl<C: Ord + Copy> CategoryView<C> {
    /// Every category in `universe` active.
    pub fn new(universe: &[C]) -> Self {
        Self {
            categories: universe.iter().copied().collect(),
            query: String::new(),
        }
    }

    /// Returns whether `category` is active afterwards.
    pub fn toggle(&mut self, category: C) -> bool {
        self.categories.toggle(category)
    }

    /// Keeps only `wanted` active; an empty slice leaves the toggles alone.
    pub fn restrict_to(&mut self, wanted: &[C]) {
        if !wanted.is_empty() {
            self.categories = wanted.iter().copied().collect();
        }
    }

    pub fn visible<'a, T>(&self, records: &'a [T]) -> Vec<&'a T>
    where
        T: Record + Categorized<Category = C>,
    {
        RecordFilter::new()
            .with_categories(self.categories.iter().copied())
            .with_query(self.query.as_str())
            .apply(records)
    }

    /// Records per category over the whole collection.
    pub fn counts<T>(records: &[T]) -> BTreeMap<C, usize>
    where
        T: Categorized<Category = C>,
    {
        count_by(records, |r| r.category())
    }
}

// ─── Traces ──────────────────────────────────────────────────────────────────

/// One positioned bar in a trace waterfall, in percent of the trace length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallBar {
    pub span_id: String,
    pub name: String,
    pub left_pct: f64,
    pub width_pct: f64,
}

/// Lays spans out against the latest span end. No spans, no bars.
/// Span ends past `u64::MAX` clamp to it.
pub fn waterfall(spans: &[&Span]) -> Vec<WaterfallBar> {
    let total = spans
        .iter()
        .map(|s| s.start_offset_ms.saturating_add(s.duration_ms))
        .max()
        .unwrap_or(0);
    if total == 0 {
        return Vec::new();
    }
    let total = total as f64;
    spans
        .iter()
        .map(|s| WaterfallBar {
            span_id: s.id.clone(),
            name: s.name.clone(),
            left_pct: s.start_offset_ms as f64 / total * 100.0,
            width_pct: s.duration_ms as f64 / total * 100.0,
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct TraceView {
    pub selected_trace: SingleSelection<String>,
    pub selected_span: SingleSelection<String>,
    pub query: String,
}

impl TraceView {
    /// Pre-selects the first trace, as the trace list does on load.
    pub fn new(traces: &[Trace]) -> Self {
        let selected_trace = match traces.first() {
            Some(trace) => SingleSelection::with(trace.id.clone()),
            None => SingleSelection::none(),
        };
        Self {
            selected_trace,
            ..Self::default()
        }
    }

    /// Switching traces drops the span selection of the previous one.
    pub fn select_trace(&mut self, id: &str) {
        if !self.selected_trace.is_selected(&id.to_string()) {
            self.selected_span.clear();
        }
        self.selected_trace.select(id.to_string());
    }

    pub fn select_span(&mut self, id: &str) {
        self.selected_span.select(id.to_string());
    }

    pub fn visible<'a>(&self, traces: &'a [Trace]) -> Vec<&'a Trace> {
        search(traces, &self.query)
    }

    /// Waterfall of the selected trace, empty when nothing is selected.
    pub fn waterfall(&self, spans: &[Span]) -> Vec<WaterfallBar> {
        let Some(trace_id) = self.selected_trace.get() else {
            return Vec::new();
        };
        let spans: Vec<&Span> = spans.iter().filter(|s| &s.trace_id == trace_id).collect();
        waterfall(&spans)
    }
}

// ─── Governance ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GovernanceView {
    /// Ids of the policies currently switched on.
    pub enabled: ToggleSet<String>,
    pub policy_query: String,
    pub audit_query: String,
}

impl GovernanceView {
    /// Policy switches start at each policy's configured state.
    pub fn new(policies: &[Policy]) -> Self {
        Self {
            enabled: policies
                .iter()
                .filter(|p| p.enabled)
                .map(|p| p.id.clone())
                .collect(),
            policy_query: String::new(),
            audit_query: String::new(),
        }
    }

    /// Returns whether the policy is on afterwards.
    pub fn toggle_policy(&mut self, id: &str) -> bool {
        self.enabled.toggle(id.to_string())
    }

    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.contains(&id.to_string())
    }

    pub fn visible_policies<'a>(
        &self,
        policies: &'a [Policy],
        kinds: Option<&[PolicyKind]>,
    ) -> Vec<&'a Policy> {
        let mut filter = RecordFilter::new().with_query(self.policy_query.as_str());
        if let Some(kinds) = kinds {
            filter = filter.with_categories(kinds.iter().copied());
        }
        filter.apply(policies)
    }

    /// Policies that exist in `policies` and are switched on.
    pub fn active_count(&self, policies: &[Policy]) -> usize {
        count_where(policies, |p| self.is_enabled(p.id()))
    }

    pub fn visible_audit<'a>(
        &self,
        audit: &'a [AuditLog],
        statuses: Option<&[AuditStatus]>,
    ) -> Vec<&'a AuditLog> {
        let mut filter = RecordFilter::new().with_query(self.audit_query.as_str());
        if let Some(statuses) = statuses {
            filter = filter.with_categories(statuses.iter().copied());
        }
        filter.apply(audit)
    }
}

// ─── Prompt studio ───────────────────────────────────────────────────────────

/// Headline numbers above the prompt list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptStats {
    pub active_prompts: usize,
    pub avg_accuracy: Option<f64>,
    pub total_tokens: u64,
    pub avg_response_time_s: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct PromptStudioView {
    pub selected: SingleSelection<String>,
    pub compare: ComparisonSelection,
}

impl PromptStudioView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: &str) {
        self.selected.select(id.to_string());
    }

    pub fn toggle_compare(&mut self, id: &str) -> SelectOutcome {
        self.compare.toggle(id)
    }

    pub fn comparison(&self, prompts: &[PromptVersion]) -> Comparison {
        compare_selected(prompts, self.compare.ids())
    }

    pub fn stats(prompts: &[PromptVersion]) -> PromptStats {
        PromptStats {
            active_prompts: count_where(prompts, |p| p.status == PromptStatus::Active),
            avg_accuracy: mean_by(prompts, |p| p.accuracy).map(round1),
            total_tokens: prompts.iter().map(|p| p.token_usage).sum(),
            avg_response_time_s: mean_by(prompts, |p| p.response_time_s).map(round1),
        }
    }
}

// ─── Multi-cloud ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloudTotals {
    pub total_clusters: usize,
    pub healthy_clusters: usize,
    pub total_agents: u64,
    pub avg_eval_score: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct MultiCloudView {
    pub provider: SingleSelection<Provider>,
    pub tab: SingleSelection<MultiCloudTab>,
}

impl MultiCloudView {
    pub fn new() -> Self {
        Self {
            provider: SingleSelection::none(),
            tab: SingleSelection::with(MultiCloudTab::Performance),
        }
    }

    /// Clusters of the selected provider, or all clusters when none is selected.
    pub fn visible<'a>(&self, clusters: &'a [CloudCluster]) -> Vec<&'a CloudCluster> {
        let mut filter = RecordFilter::new();
        if let Some(provider) = self.provider.get() {
            filter = filter.with_categories([*provider]);
        }
        filter.apply(clusters)
    }

    /// Totals over every cluster, independent of the provider filter.
    pub fn totals(clusters: &[CloudCluster]) -> CloudTotals {
        CloudTotals {
            total_clusters: clusters.len(),
            healthy_clusters: count_where(clusters, |c| c.status == ClusterHealth::Healthy),
            total_agents: clusters.iter().map(|c| u64::from(c.agents)).sum(),
            avg_eval_score: mean_by(clusters, |c| c.eval_score).map(round1),
        }
    }

    pub fn clusters_per_provider(clusters: &[CloudCluster]) -> BTreeMap<Provider, usize> {
        count_by(clusters, |c| c.provider)
    }
}

impl Default for MultiCloudView {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Azure ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AzureView {
    pub cluster: SingleSelection<String>,
    pub tab: SingleSelection<AzureTab>,
    pub expanded_deployment: SingleSelection<String>,
}

impl AzureView {
    /// First cluster selected, clusters tab open.
    pub fn new(clusters: &[AksCluster]) -> Self {
        let cluster = match clusters.first() {
            Some(c) => SingleSelection::with(c.id.clone()),
            None => SingleSelection::none(),
        };
        Self {
            cluster,
            tab: SingleSelection::with(AzureTab::Clusters),
            expanded_deployment: SingleSelection::none(),
        }
    }

    pub fn selected_cluster<'a>(&self, clusters: &'a [AksCluster]) -> Option<&'a AksCluster> {
        find_by_id(clusters, self.cluster.get()?)
    }

    pub fn visible_clusters<'a>(
        &self,
        clusters: &'a [AksCluster],
        statuses: Option<&[AksStatus]>,
    ) -> Vec<&'a AksCluster> {
        let mut filter = RecordFilter::new();
        if let Some(statuses) = statuses {
            filter = filter.with_categories(statuses.iter().copied());
        }
        filter.apply(clusters)
    }

    pub fn visible_deployments<'a>(
        &self,
        deployments: &'a [AgentDeployment],
        statuses: Option<&[DeploymentStatus]>,
    ) -> Vec<&'a AgentDeployment> {
        let mut filter = RecordFilter::new();
        if let Some(statuses) = statuses {
            filter = filter.with_categories(statuses.iter().copied());
        }
        filter.apply(deployments)
    }

    pub fn toggle_deployment(&mut self, id: &str) {
        self.expanded_deployment.toggle(id.to_string());
    }

    /// Deployments running fewer replicas than desired.
    pub fn under_replicated(deployments: &[AgentDeployment]) -> Vec<&AgentDeployment> {
        deployments
            .iter()
            .filter(|d| d.replicas_current < d.replicas_desired)
            .collect()
    }
}
