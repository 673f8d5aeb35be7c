//! Static reference datasets behind every dashboard view.
//!
//! The built-in catalog is compiled into the crate as YAML; an alternative
//! document with the same shape can be loaded from disk as YAML or JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AgentOpsError, Result};
use crate::filter::find_by_id;
use crate::models::{
    Agent, AgentDeployment, AksCluster, AuditLog, CloudCluster, CloudProvider, HitlTask, Insight,
    Integration, LogEntry, Policy, PromptVersion, Span, Trace,
};

const BUILTIN: &str = include_str!("../data/agentops.yaml");

/// Every read-only collection the dashboard draws from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub agents: Vec<Agent>,
    pub insights: Vec<Insight>,
    pub logs: Vec<LogEntry>,
    pub traces: Vec<Trace>,
    pub spans: Vec<Span>,
    pub policies: Vec<Policy>,
    pub audit_logs: Vec<AuditLog>,
    pub prompts: Vec<PromptVersion>,
    pub hitl_tasks: Vec<HitlTask>,
    pub integrations: Vec<Integration>,
    pub cloud_providers: Vec<CloudProvider>,
    pub clusters: Vec<CloudCluster>,
    pub aks_clusters: Vec<AksCluster>,
    pub deployments: Vec<AgentDeployment>,
}

impl Catalog {
    /// The datasets shipped with the crate.
    pub fn builtin() -> Result<Self> {
        let catalog = Self::from_yaml(BUILTIN)?;
        debug!(records = catalog.len(), "Loaded built-in catalog");
        Ok(catalog)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Reads a catalog document from `path`. Collections it omits are empty.
    /// A `.json` extension selects JSON, anything else is read as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let catalog = if is_json {
            Self::from_json(&content)?
        } else {
            Self::from_yaml(&content)?
        };
        info!(path = %path.display(), records = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Total number of records across all collections.
    pub fn len(&self) -> usize {
        self.agents.len()
            + self.insights.len()
            + self.logs.len()
            + self.traces.len()
            + self.spans.len()
            + self.policies.len()
            + self.audit_logs.len()
            + self.prompts.len()
            + self.hitl_tasks.len()
            + self.integrations.len()
            + self.cloud_providers.len()
            + self.clusters.len()
            + self.aks_clusters.len()
            + self.deployments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spans belonging to `trace_id`, in recorded order.
    pub fn spans_for(&self, trace_id: &str) -> Vec<&Span> {
        self.spans.iter().filter(|s| s.trace_id == trace_id).collect()
    }

    pub fn trace(&self, id: &str) -> Result<&Trace> {
        find_by_id(&self.traces, id).ok_or_else(|| AgentOpsError::RecordNotFound {
            collection: "trace",
            id: id.to_string(),
        })
    }

    pub fn prompt(&self, id: &str) -> Result<&PromptVersion> {
        find_by_id(&self.prompts, id).ok_or_else(|| AgentOpsError::RecordNotFound {
            collection: "prompt",
            id: id.to_string(),
        })
    }
}
