//! Data models for agentops-core.
//!
//! Every record here is read-only reference data: the catalog loads them once
//! and views only filter, aggregate or compare them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{AgentOpsError, Result};

/// A record that can be looked up by id and matched by a text query.
pub trait Record {
    fn id(&self) -> &str;

    /// Text fields a search box matches against.
    fn search_fields(&self) -> Vec<&str>;
}

/// A record with a categorical field drawn from a closed enum.
pub trait Categorized {
    type Category: Copy + Ord;

    fn category(&self) -> Self::Category;
}

/// Declares a closed string enum with serde names, `Display` and `FromStr`.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident as $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = AgentOpsError;

            fn from_str(s: &str) -> Result<Self> {
                let needle = s.trim().to_ascii_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == needle)
                    .ok_or_else(|| AgentOpsError::InvalidValue {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

// ─── Pages ───────────────────────────────────────────────────────────────────

/// A navigable dashboard page. The set is closed: nine pages, always.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageId {
    Dashboard,
    Observability,
    InsightsTower,
    Evaluation,
    Prompts,
    Governance,
    Azure,
    MultiCloud,
    Integrations,
}

impl PageId {
    /// All pages in navigation order.
    pub const ALL: [PageId; 9] = [
        PageId::Dashboard,
        PageId::Observability,
        PageId::InsightsTower,
        PageId::Evaluation,
        PageId::Prompts,
        PageId::Governance,
        PageId::Azure,
        PageId::MultiCloud,
        PageId::Integrations,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PageId::Dashboard => "dashboard",
            PageId::Observability => "observability",
            PageId::InsightsTower => "insights-tower",
            PageId::Evaluation => "evaluation",
            PageId::Prompts => "prompts",
            PageId::Governance => "governance",
            PageId::Azure => "azure",
            PageId::MultiCloud => "multi-cloud",
            PageId::Integrations => "integrations",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PageId::Dashboard => "Dashboard",
            PageId::Observability => "Observability",
            PageId::InsightsTower => "AI InsightsTower",
            PageId::Evaluation => "Evaluation Metrics",
            PageId::Prompts => "Prompt Studio",
            PageId::Governance => "Agent Governance",
            PageId::Azure => "Azure Integration",
            PageId::MultiCloud => "Multi-Cloud Dashboard",
            PageId::Integrations => "MCP Integrations",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PageId::Dashboard => "Real-time observability overview",
            PageId::Observability => "Traces, logs, and service health",
            PageId::InsightsTower => "Meta-agent self-improvement system",
            PageId::Evaluation => "Multi-layer performance analysis",
            PageId::Prompts => "Manage and test agent prompts",
            PageId::Governance => "Policies, guardrails, and audit",
            PageId::Azure => "AKS clusters and observability pipeline",
            PageId::MultiCloud => "Unified view across Azure, AWS, GCP",
            PageId::Integrations => "IT Service Management connections",
        }
    }

    pub fn badge(self) -> Option<&'static str> {
        match self {
            PageId::Observability => Some("LIVE"),
            PageId::InsightsTower => Some("META"),
            PageId::Azure | PageId::MultiCloud => Some("NEW"),
            _ => None,
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageId {
    type Err = AgentOpsError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        PageId::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| AgentOpsError::UnknownPage(s.to_string()))
    }
}

/// What the main content area shows: one of the pages, or the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Page(PageId),
    Settings,
}

impl Section {
    pub fn title(self) -> &'static str {
        match self {
            Section::Page(page) => page.label(),
            Section::Settings => "Settings",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Section::Page(PageId::Observability) => "Traces, logs, and service health monitoring",
            Section::Page(PageId::Azure) => {
                "AKS clusters, observability pipeline, and remote evaluation"
            }
            Section::Page(PageId::MultiCloud) => "Unified view across Azure, AWS, and GCP",
            Section::Page(page) => page.description(),
            Section::Settings => "Configure navigation and preferences",
        }
    }
}

impl Default for Section {
    fn default() -> Self {
        Section::Page(PageId::Dashboard)
    }
}

// ─── Categorical fields ──────────────────────────────────────────────────────

string_enum! {
    AgentStatus as "agent status" {
        Healthy => "healthy",
        Warning => "warning",
        Critical => "critical",
        Idle => "idle",
    }
}

string_enum! {
    InsightKind as "insight kind" {
        Optimization => "optimization",
        Warning => "warning",
        Success => "success",
    }
}

string_enum! {
    /// Log severity, in the order the level toggles are shown.
    LogLevel as "log level" {
        Info => "info",
        Warn => "warn",
        Error => "error",
        Debug => "debug",
    }
}

string_enum! {
    TraceStatus as "trace status" {
        Success => "success",
        Error => "error",
        Warning => "warning",
    }
}

string_enum! {
    SpanKind as "span kind" {
        Agent => "agent",
        Tool => "tool",
        Model => "model",
        External => "external",
    }
}

string_enum! {
    PolicyKind as "policy type" {
        Guardrail => "guardrail",
        Boundary => "boundary",
        Hitl => "hitl",
        Audit => "audit",
    }
}

string_enum! {
    AuditStatus as "audit status" {
        Success => "success",
        Blocked => "blocked",
        Review => "review",
    }
}

string_enum! {
    PromptStatus as "prompt status" {
        Active => "active",
        Testing => "testing",
        Archived => "archived",
    }
}

string_enum! {
    HitlStatus as "HITL status" {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

string_enum! {
    IntegrationStatus as "integration status" {
        Connected => "connected",
        Disconnected => "disconnected",
        Syncing => "syncing",
    }
}

string_enum! {
    IntegrationKind as "integration type" {
        Ticketing => "ticketing",
        Monitoring => "monitoring",
        Communication => "communication",
    }
}

string_enum! {
    Provider as "cloud provider" {
        Azure => "azure",
        Aws => "aws",
        Gcp => "gcp",
    }
}

string_enum! {
    ClusterHealth as "cluster health" {
        Healthy => "healthy",
        Warning => "warning",
        Critical => "critical",
    }
}

string_enum! {
    AksStatus as "AKS cluster status" {
        Running => "running",
        Updating => "updating",
        Error => "error",
    }
}

string_enum! {
    DeploymentStatus as "deployment status" {
        Healthy => "healthy",
        Degraded => "degraded",
        Unhealthy => "unhealthy",
    }
}

string_enum! {
    /// Tabs of the Azure integration page.
    AzureTab as "Azure tab" {
        Clusters => "clusters",
        Agents => "agents",
        Observability => "observability",
        Evaluation => "evaluation",
        Services => "services",
    }
}

string_enum! {
    /// Tabs of the multi-cloud page.
    MultiCloudTab as "multi-cloud tab" {
        Performance => "performance",
        Comparison => "comparison",
        Costs => "costs",
        Distribution => "distribution",
    }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// Health card for a running agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: AgentStatus,
    pub accuracy: f64,
    pub response_time_s: f64,
    pub last_active: String,
    pub tasks_completed: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub impact: String,
    pub agent: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    #[serde(with = "log_timestamp")]
    pub timestamp: NaiveDateTime,
    pub level: LogLevel,
    pub message: String,
    pub service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    pub id: String,
    pub name: String,
    pub service: String,
    pub status: TraceStatus,
    pub duration_ms: u64,
    pub timestamp: String,
    pub spans: u32,
    pub agent: String,
}

/// One bar of a trace waterfall. Offsets are relative to the trace start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    pub id: String,
    pub trace_id: String,
    pub name: String,
    pub service: String,
    pub duration_ms: u64,
    pub start_offset_ms: u64,
    pub status: TraceStatus,
    #[serde(rename = "type")]
    pub kind: SpanKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: PolicyKind,
    /// Initial state of the policy toggle.
    pub enabled: bool,
    pub applied_to: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: String,
    pub action: String,
    pub agent: String,
    pub user: String,
    pub timestamp: String,
    pub status: AuditStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptVersion {
    pub id: String,
    pub version: String,
    pub agent: String,
    pub status: PromptStatus,
    /// Percent, 0-100.
    pub accuracy: f64,
    /// Tokens per request.
    pub token_usage: u64,
    pub response_time_s: f64,
    /// USD per request.
    pub cost_per_request: f64,
    pub evaluations: u64,
    pub last_modified: String,
}

/// A human-in-the-loop approval request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitlTask {
    pub id: String,
    pub title: String,
    pub agent: String,
    pub priority: String,
    pub status: HitlStatus,
    pub requested: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: IntegrationStatus,
    pub last_sync: String,
    pub events_processed: u64,
    #[serde(rename = "type")]
    pub kind: IntegrationKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudProvider {
    pub id: Provider,
    pub name: String,
    pub clusters: u32,
    pub agents: u32,
    pub status: ClusterHealth,
    pub spend_usd: f64,
    pub trend_pct: f64,
}

/// A Kubernetes cluster in the multi-cloud view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudCluster {
    pub id: String,
    pub provider: Provider,
    pub name: String,
    pub region: String,
    pub nodes: u32,
    pub agents: u32,
    pub cpu_pct: u32,
    pub memory_pct: u32,
    pub status: ClusterHealth,
    pub eval_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AksCluster {
    pub id: String,
    pub name: String,
    pub resource_group: String,
    pub location: String,
    pub kubernetes_version: String,
    pub node_count: u32,
    pub status: AksStatus,
    pub agents: u32,
    pub workflows: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDeployment {
    pub id: String,
    pub name: String,
    pub namespace: String,
    pub replicas_current: u32,
    pub replicas_desired: u32,
    pub status: DeploymentStatus,
    pub cpu_pct: u32,
    pub memory_pct: u32,
    pub restarts: u32,
    pub last_evaluation: String,
    pub evaluation_score: f64,
}

// ─── Record / Categorized impls ──────────────────────────────────────────────

impl Record for Agent {
    fn id(&self) -> &str {
        &self.name
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.kind.as_str()]
    }
}

impl Categorized for Agent {
    type Category = AgentStatus;

    fn category(&self) -> AgentStatus {
        self.status
    }
}

impl Record for Insight {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str(), self.agent.as_str()]
    }
}

impl Categorized for Insight {
    type Category = InsightKind;

    fn category(&self) -> InsightKind {
        self.kind
    }
}

impl Record for LogEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.message.as_str(), self.service.as_str()];
        if let Some(trace_id) = &self.trace_id {
            fields.push(trace_id);
        }
        fields
    }
}

impl Categorized for LogEntry {
    type Category = LogLevel;

    fn category(&self) -> LogLevel {
        self.level
    }
}

impl Record for Trace {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.name.as_str(), self.service.as_str(), self.agent.as_str()]
    }
}

impl Categorized for Trace {
    type Category = TraceStatus;

    fn category(&self) -> TraceStatus {
        self.status
    }
}

impl Record for Policy {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.description.as_str()];
        fields.extend(self.applied_to.iter().map(String::as_str));
        fields
    }
}

impl Categorized for Policy {
    type Category = PolicyKind;

    fn category(&self) -> PolicyKind {
        self.kind
    }
}

impl Record for AuditLog {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.action.as_str(), self.agent.as_str(), self.user.as_str()]
    }
}

impl Categorized for AuditLog {
    type Category = AuditStatus;

    fn category(&self) -> AuditStatus {
        self.status
    }
}

impl Record for PromptVersion {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.version.as_str(), self.agent.as_str()]
    }
}

impl Categorized for PromptVersion {
    type Category = PromptStatus;

    fn category(&self) -> PromptStatus {
        self.status
    }
}

impl Record for HitlTask {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.agent.as_str(), self.priority.as_str()]
    }
}

impl Categorized for HitlTask {
    type Category = HitlStatus;

    fn category(&self) -> HitlStatus {
        self.status
    }
}

impl Record for Integration {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }
}

impl Categorized for Integration {
    type Category = IntegrationStatus;

    fn category(&self) -> IntegrationStatus {
        self.status
    }
}

impl Record for CloudCluster {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.region.as_str(), self.provider.as_str()]
    }
}

impl Categorized for CloudCluster {
    type Category = Provider;

    fn category(&self) -> Provider {
        self.provider
    }
}

impl Record for AksCluster {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.resource_group.as_str(), self.location.as_str()]
    }
}

impl Categorized for AksCluster {
    type Category = AksStatus;

    fn category(&self) -> AksStatus {
        self.status
    }
}

impl Record for AgentDeployment {
    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.namespace.as_str()]
    }
}

impl Categorized for AgentDeployment {
    type Category = DeploymentStatus;

    fn category(&self) -> DeploymentStatus {
        self.status
    }
}

// ─── Serde helpers ───────────────────────────────────────────────────────────

/// `2024-01-15 14:32:45.123` style timestamps used by the log stream.
mod log_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_ids_round_trip_through_their_keys() {
        for page in PageId::ALL {
            assert_eq!(page.as_str().parse::<PageId>().unwrap(), page);
        }
    }

    #[test]
    fn page_keys_parse_case_insensitively() {
        assert_eq!("Multi-Cloud".parse::<PageId>().unwrap(), PageId::MultiCloud);
        assert_eq!(" GOVERNANCE ".parse::<PageId>().unwrap(), PageId::Governance);
    }

    #[test]
    fn unknown_page_is_rejected() {
        let err = "settings".parse::<PageId>().unwrap_err();
        assert!(matches!(err, AgentOpsError::UnknownPage(ref key) if key == "settings"));
    }

    #[test]
    fn page_serializes_as_kebab_case() {
        let json = serde_json::to_string(&PageId::InsightsTower).unwrap();
        assert_eq!(json, "\"insights-tower\"");
    }

    #[test]
    fn string_enums_parse_case_insensitively() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" gcp ".parse::<Provider>().unwrap(), Provider::Gcp);
        assert!(matches!(
            "fatal".parse::<LogLevel>(),
            Err(AgentOpsError::InvalidValue { kind: "log level", .. })
        ));
    }

    #[test]
    fn section_titles_follow_pages() {
        assert_eq!(Section::default().title(), "Dashboard");
        assert_eq!(Section::Settings.title(), "Settings");
        assert_eq!(
            Section::Page(PageId::MultiCloud).subtitle(),
            "Unified view across Azure, AWS, and GCP"
        );
        assert_eq!(
            Section::Page(PageId::Prompts).subtitle(),
            "Manage and test agent prompts"
        );
    }

    #[test]
    fn log_entry_parses_millisecond_timestamps() {
        let yaml = r#"
id: "1"
timestamp: "2024-01-15 14:32:45.123"
level: info
message: hello
service: Gateway
"#;
        let entry: LogEntry = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(entry.level, LogLevel::Info);
        assert!(entry.trace_id.is_none());
        let back = serde_yaml::to_string(&entry).unwrap();
        assert!(back.contains("2024-01-15 14:32:45.123"));
    }
}
