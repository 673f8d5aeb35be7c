//! agentops CLI: terminal rendition of the AgentOps dashboard views.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use agentops_core::models::{
    AgentStatus, AksStatus, AuditStatus, DeploymentStatus, HitlStatus, InsightKind,
    IntegrationStatus, LogLevel, PolicyKind, Provider,
};
use agentops_core::views::{
    waterfall, AzureView, CategoryView, LogStreamView, MultiCloudView, PromptStudioView,
};
use agentops_core::{AgentOpsError, Dashboard, DashboardConfig, Direction, PageId, SelectOutcome};

#[derive(Parser)]
#[command(
    name = "agentops",
    about = "AgentOps dashboard views in the terminal",
    version,
    author
)]
struct Cli {
    /// Catalog YAML to use instead of the built-in data
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which pages are enabled for navigation
    Pages {
        /// Page to disable (repeatable)
        #[arg(long)]
        disable: Vec<String>,
        /// Enable only this page
        #[arg(long, conflicts_with = "disable")]
        only: Option<String>,
    },
    /// Agent health cards
    Agents {
        /// Agent status to show (repeatable)
        #[arg(long)]
        status: Vec<String>,
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Meta-agent insight feed
    Insights {
        /// Insight type to show (repeatable)
        #[arg(long = "type", short = 't')]
        kind: Vec<String>,
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Human-in-the-loop approval queue
    Hitl {
        /// Task status to show (repeatable)
        #[arg(long)]
        status: Vec<String>,
        #[arg(long, short)]
        search: Option<String>,
    },
    /// ITSM and messaging integrations
    Integrations {
        /// Connection status to show (repeatable)
        #[arg(long)]
        status: Vec<String>,
        #[arg(long, short)]
        search: Option<String>,
    },
    /// AKS clusters and agent deployments
    Azure {
        /// Cluster status to show (repeatable)
        #[arg(long)]
        cluster_status: Vec<String>,
        /// Deployment status to show (repeatable)
        #[arg(long)]
        deployment_status: Vec<String>,
    },
    /// Filter the live log stream
    Logs {
        /// Level to show (repeatable, default: all)
        #[arg(long, short)]
        level: Vec<String>,
        /// Case-insensitive text search
        #[arg(long, short)]
        search: Option<String>,
        /// Output format
        #[arg(long, short, default_value = "table", value_parser = ["table", "json"])]
        format: String,
    },
    /// List recent traces
    Traces {
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Draw the span waterfall of a trace
    Waterfall {
        /// Trace id (default: the first trace)
        trace: Option<String>,
    },
    /// List governance policies
    Policies {
        #[arg(long, short)]
        search: Option<String>,
        /// Policy type to show (repeatable)
        #[arg(long = "type", short = 't')]
        kind: Vec<String>,
        /// Flip a policy switch before listing (repeatable)
        #[arg(long)]
        toggle: Vec<String>,
    },
    /// List the governance audit trail
    Audit {
        #[arg(long, short)]
        search: Option<String>,
        /// Audit status to show (repeatable)
        #[arg(long)]
        status: Vec<String>,
    },
    /// List prompt versions
    Prompts,
    /// Compare two prompt versions side by side
    Compare { first: String, second: String },
    /// List clusters across cloud providers
    Clusters {
        #[arg(long, short)]
        provider: Option<String>,
    },
    /// Headline counters of the dashboard page
    Summary,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let mut config = DashboardConfig::new();
    if let Some(path) = cli.data {
        config = config.with_data_path(path);
    }

    match cli.command {
        Commands::Pages { disable, only } => cmd_pages(config, disable, only)?,
        Commands::Agents { status, search } => {
            cmd_agents(Dashboard::new(&config)?, status, search)?
        }
        Commands::Insights { kind, search } => {
            cmd_insights(Dashboard::new(&config)?, kind, search)?
        }
        Commands::Hitl { status, search } => cmd_hitl(Dashboard::new(&config)?, status, search)?,
        Commands::Integrations { status, search } => {
            cmd_integrations(Dashboard::new(&config)?, status, search)?
        }
        Commands::Azure { cluster_status, deployment_status } => {
            cmd_azure(&Dashboard::new(&config)?, cluster_status, deployment_status)?
        }
        Commands::Logs { level, search, format } => {
            cmd_logs(&Dashboard::new(&config)?, level, search, format)?
        }
        Commands::Traces { search } => cmd_traces(Dashboard::new(&config)?, search),
        Commands::Waterfall { trace } => cmd_waterfall(Dashboard::new(&config)?, trace)?,
        Commands::Policies { search, kind, toggle } => {
            cmd_policies(Dashboard::new(&config)?, search, kind, toggle)?
        }
        Commands::Audit { search, status } => {
            cmd_audit(Dashboard::new(&config)?, search, status)?
        }
        Commands::Prompts => cmd_prompts(&Dashboard::new(&config)?),
        Commands::Compare { first, second } => {
            cmd_compare(Dashboard::new(&config)?, first, second)?
        }
        Commands::Clusters { provider } => cmd_clusters(Dashboard::new(&config)?, provider)?,
        Commands::Summary => cmd_summary(&Dashboard::new(&config)?),
    }

    Ok(())
}

// ─── Command implementations ──────────────────────────────────────────────────

fn cmd_pages(config: DashboardConfig, disable: Vec<String>, only: Option<String>) -> Result<()> {
    let mut config = config;
    for page in parse_all::<PageId>(&disable)? {
        config = config.with_disabled(page);
    }
    let mut dashboard = Dashboard::new(&config)?;
    if let Some(only) = only {
        dashboard.visibility.show_only(only.parse::<PageId>()?);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Page", "Label", "Description", "Badge", "Enabled"]);
    for (page, enabled) in dashboard.visibility.visibility().iter() {
        table.add_row([
            page.as_str(),
            page.label(),
            page.description(),
            page.badge().unwrap_or("-"),
            if enabled { "✓" } else { "✗" },
        ]);
    }
    println!("{}", table);

    let nav: Vec<&str> = dashboard.navigation().iter().map(|p| p.label()).collect();
    println!("Navigation: {}", nav.join(" · "));
    println!(
        "{} of {} pages enabled",
        dashboard.visibility.enabled_count(),
        PageId::ALL.len()
    );
    Ok(())
}

fn cmd_agents(mut dashboard: Dashboard, status: Vec<String>, search: Option<String>) -> Result<()> {
    dashboard.agents.restrict_to(&parse_all::<AgentStatus>(&status)?);
    dashboard.agents.query = search.unwrap_or_default();
    let agents = &dashboard.catalog().agents;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Agent", "Type", "Status", "Accuracy", "Latency", "Tasks", "Last active"]);
    for agent in dashboard.agents.visible(agents) {
        table.add_row([
            agent.name.clone(),
            agent.kind.clone(),
            agent.status.to_string(),
            format!("{:.1}%", agent.accuracy),
            format!("{:.1}s", agent.response_time_s),
            agent.tasks_completed.to_string(),
            agent.last_active.clone(),
        ]);
    }
    println!("{}", table);
    println!("{}", format_counts(&CategoryView::<AgentStatus>::counts(agents)));
    Ok(())
}

fn cmd_insights(mut dashboard: Dashboard, kinds: Vec<String>, search: Option<String>) -> Result<()> {
    dashboard.insights.restrict_to(&parse_all::<InsightKind>(&kinds)?);
    dashboard.insights.query = search.unwrap_or_default();

    let insights = dashboard.insights.visible(&dashboard.catalog().insights);
    if insights.is_empty() {
        println!("No insights match");
        return Ok(());
    }
    for insight in insights {
        println!("[{}] {} ({})", insight.kind, insight.title, insight.impact);
        println!("    {} · {} · {}", insight.description, insight.agent, insight.timestamp);
    }
    Ok(())
}

fn cmd_hitl(mut dashboard: Dashboard, status: Vec<String>, search: Option<String>) -> Result<()> {
    dashboard.hitl.restrict_to(&parse_all::<HitlStatus>(&status)?);
    dashboard.hitl.query = search.unwrap_or_default();
    let tasks = &dashboard.catalog().hitl_tasks;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Id", "Task", "Agent", "Priority", "Status", "Requested"]);
    for task in dashboard.hitl.visible(tasks) {
        table.add_row([
            task.id.as_str(),
            task.title.as_str(),
            task.agent.as_str(),
            task.priority.as_str(),
            task.status.as_str(),
            task.requested.as_str(),
        ]);
    }
    println!("{}", table);
    println!("{}", format_counts(&CategoryView::<HitlStatus>::counts(tasks)));
    Ok(())
}

fn cmd_integrations(
    mut dashboard: Dashboard,
    status: Vec<String>,
    search: Option<String>,
) -> Result<()> {
    dashboard.integrations.restrict_to(&parse_all::<IntegrationStatus>(&status)?);
    dashboard.integrations.query = search.unwrap_or_default();
    let integrations = &dashboard.catalog().integrations;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Integration", "Type", "Status", "Last sync", "Events"]);
    for i in dashboard.integrations.visible(integrations) {
        table.add_row([
            i.name.clone(),
            i.kind.to_string(),
            i.status.to_string(),
            i.last_sync.clone(),
            i.events_processed.to_string(),
        ]);
    }
    println!("{}", table);
    println!("{}", format_counts(&CategoryView::<IntegrationStatus>::counts(integrations)));
    Ok(())
}

fn cmd_azure(
    dashboard: &Dashboard,
    cluster_status: Vec<String>,
    deployment_status: Vec<String>,
) -> Result<()> {
    let catalog = dashboard.catalog();
    let view = &dashboard.azure;
    let cluster_status = parse_all::<AksStatus>(&cluster_status)?;
    let deployment_status = parse_all::<DeploymentStatus>(&deployment_status)?;

    let mut clusters = Table::new();
    clusters.load_preset(UTF8_FULL);
    clusters.set_header(["Cluster", "Resource group", "Location", "K8s", "Nodes", "Agents", "Status"]);
    for c in view.visible_clusters(
        &catalog.aks_clusters,
        (!cluster_status.is_empty()).then_some(cluster_status.as_slice()),
    ) {
        clusters.add_row([
            c.name.clone(),
            c.resource_group.clone(),
            c.location.clone(),
            c.kubernetes_version.clone(),
            c.node_count.to_string(),
            c.agents.to_string(),
            c.status.to_string(),
        ]);
    }
    println!("{}", clusters);
    if let Some(selected) = view.selected_cluster(&catalog.aks_clusters) {
        println!("Selected cluster: {}", selected.name);
    }

    let mut deployments = Table::new();
    deployments.load_preset(UTF8_FULL);
    deployments.set_header(["Deployment", "Replicas", "CPU", "Mem", "Restarts", "Eval", "Status"]);
    for d in view.visible_deployments(
        &catalog.deployments,
        (!deployment_status.is_empty()).then_some(deployment_status.as_slice()),
    ) {
        deployments.add_row([
            d.name.clone(),
            format!("{}/{}", d.replicas_current, d.replicas_desired),
            format!("{}%", d.cpu_pct),
            format!("{}%", d.memory_pct),
            d.restarts.to_string(),
            format!("{:.1}", d.evaluation_score),
            d.status.to_string(),
        ]);
    }
    println!("{}", deployments);

    let lagging: Vec<&str> = AzureView::under_replicated(&catalog.deployments)
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    if !lagging.is_empty() {
        println!("Under-replicated: {}", lagging.join(", "));
    }
    Ok(())
}

fn cmd_logs(
    dashboard: &Dashboard,
    levels: Vec<String>,
    search: Option<String>,
    format: String,
) -> Result<()> {
    let mut view = LogStreamView::new();
    if !levels.is_empty() {
        let wanted = parse_all::<LogLevel>(&levels)?;
        for level in LogLevel::ALL {
            if !wanted.contains(level) {
                view.toggle_level(*level);
            }
        }
    }
    view.query = search.unwrap_or_default();

    let logs = &dashboard.catalog().logs;
    let visible = view.visible(logs);
    debug!(shown = visible.len(), total = logs.len(), "Filtered log stream");

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&visible)?),
        "table" => {
            if visible.is_empty() {
                println!("No log entries match");
                return Ok(());
            }
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(["Timestamp", "Level", "Service", "Message", "Trace"]);
            for log in &visible {
                table.add_row([
                    log.timestamp.format("%H:%M:%S%.3f").to_string(),
                    log.level.as_str().to_uppercase(),
                    log.service.clone(),
                    log.message.clone(),
                    log.trace_id.clone().unwrap_or_else(|| "-".to_string()),
                ]);
            }
            println!("{}", table);

            let counts = LogStreamView::level_counts(logs);
            let summary: Vec<String> = LogLevel::ALL
                .iter()
                .map(|l| format!("{}: {}", l, counts.get(l).copied().unwrap_or(0)))
                .collect();
            println!("{} of {} entries ({})", visible.len(), logs.len(), summary.join(", "));
        }
        _ => anyhow::bail!("Unknown format: {}", format),
    }
    Ok(())
}

fn cmd_traces(mut dashboard: Dashboard, search: Option<String>) {
    dashboard.traces.query = search.unwrap_or_default();
    let traces = dashboard.traces.visible(&dashboard.catalog().traces);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Trace", "Name", "Agent", "Status", "Duration", "Spans", "When"]);
    for trace in &traces {
        table.add_row([
            trace.id.clone(),
            trace.name.clone(),
            trace.agent.clone(),
            trace.status.to_string(),
            format!("{}ms", trace.duration_ms),
            trace.spans.to_string(),
            trace.timestamp.clone(),
        ]);
    }
    println!("{}", table);
}

fn cmd_waterfall(mut dashboard: Dashboard, trace: Option<String>) -> Result<()> {
    if let Some(id) = trace {
        dashboard.catalog().trace(&id)?;
        dashboard.traces.select_trace(&id);
    }
    let Some(id) = dashboard.traces.selected_trace.get().cloned() else {
        anyhow::bail!("No traces in catalog");
    };
    let trace = dashboard.catalog().trace(&id)?;
    println!("{} · {} ({}ms, {})", trace.id, trace.name, trace.duration_ms, trace.status);

    let spans = dashboard.catalog().spans_for(&id);
    let bars = waterfall(&spans);
    if bars.is_empty() {
        println!("No spans recorded for this trace");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Span", "Service", "Kind", "Duration", "Timeline"]);
    for (span, bar) in spans.iter().zip(&bars) {
        table.add_row([
            span.name.clone(),
            span.service.clone(),
            span.kind.to_string(),
            format!("{}ms", span.duration_ms),
            timeline(bar.left_pct, bar.width_pct, 40),
        ]);
    }
    println!("{}", table);
    Ok(())
}

fn cmd_policies(
    mut dashboard: Dashboard,
    search: Option<String>,
    kinds: Vec<String>,
    toggles: Vec<String>,
) -> Result<()> {
    for id in &toggles {
        if !dashboard.catalog().policies.iter().any(|p| &p.id == id) {
            return Err(AgentOpsError::RecordNotFound {
                collection: "policy",
                id: id.clone(),
            }
            .into());
        }
        dashboard.governance.toggle_policy(id);
    }
    dashboard.governance.policy_query = search.unwrap_or_default();
    let kinds = parse_all::<PolicyKind>(&kinds)?;
    let kinds = (!kinds.is_empty()).then_some(kinds.as_slice());

    let policies = &dashboard.catalog().policies;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Id", "Policy", "Type", "Applied to", "Enabled"]);
    for policy in dashboard.governance.visible_policies(policies, kinds) {
        table.add_row([
            policy.id.clone(),
            policy.name.clone(),
            policy.kind.to_string(),
            policy.applied_to.join(", "),
            if dashboard.governance.is_enabled(&policy.id) { "✓" } else { "✗" }.to_string(),
        ]);
    }
    println!("{}", table);
    println!(
        "Active policies: {} of {}",
        dashboard.governance.active_count(policies),
        policies.len()
    );
    Ok(())
}

fn cmd_audit(mut dashboard: Dashboard, search: Option<String>, statuses: Vec<String>) -> Result<()> {
    dashboard.governance.audit_query = search.unwrap_or_default();
    let statuses = parse_all::<AuditStatus>(&statuses)?;
    let statuses = (!statuses.is_empty()).then_some(statuses.as_slice());

    let entries = dashboard
        .governance
        .visible_audit(&dashboard.catalog().audit_logs, statuses);
    if entries.is_empty() {
        println!("No audit entries match");
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["When", "Action", "Agent", "User", "Status"]);
    for entry in entries {
        table.add_row([
            entry.timestamp.as_str(),
            entry.action.as_str(),
            entry.agent.as_str(),
            entry.user.as_str(),
            entry.status.as_str(),
        ]);
    }
    println!("{}", table);
    Ok(())
}

fn cmd_prompts(dashboard: &Dashboard) {
    let prompts = &dashboard.catalog().prompts;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header([
        "Id", "Version", "Agent", "Status", "Accuracy", "Tokens", "Latency", "Cost", "Evals",
    ]);
    for p in prompts {
        table.add_row([
            p.id.clone(),
            p.version.clone(),
            p.agent.clone(),
            p.status.to_string(),
            format!("{:.1}%", p.accuracy),
            p.token_usage.to_string(),
            format!("{:.1}s", p.response_time_s),
            format!("${:.3}", p.cost_per_request),
            p.evaluations.to_string(),
        ]);
    }
    println!("{}", table);

    let stats = PromptStudioView::stats(prompts);
    println!(
        "Active: {}  Avg accuracy: {}  Total tokens: {}  Avg latency: {}",
        stats.active_prompts,
        stats.avg_accuracy.map(|v| format!("{v:.1}%")).unwrap_or_else(|| "-".into()),
        stats.total_tokens,
        stats.avg_response_time_s.map(|v| format!("{v:.1}s")).unwrap_or_else(|| "-".into()),
    );
}

fn cmd_compare(mut dashboard: Dashboard, first: String, second: String) -> Result<()> {
    dashboard.prompts.toggle_compare(&first);
    if dashboard.prompts.toggle_compare(&second) != SelectOutcome::Added {
        anyhow::bail!("Pick two different prompt versions to compare");
    }
    let cmp = dashboard.prompts.comparison(&dashboard.catalog().prompts);
    let missing = cmp.missing();
    if !missing.is_empty() {
        anyhow::bail!("Prompt version not found: {}", missing.join(", "));
    }

    let a = dashboard.catalog().prompt(&first)?;
    let b = dashboard.catalog().prompt(&second)?;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Metric", a.version.as_str(), b.version.as_str(), "Diff", "Better"]);
    for row in &cmp.rows {
        let better = if row.diff > 0.0 {
            a.version.as_str()
        } else if row.diff < 0.0 {
            b.version.as_str()
        } else {
            "="
        };
        let arrow = match row.direction {
            Direction::HigherIsBetter => "↑",
            Direction::LowerIsBetter => "↓",
        };
        table.add_row([
            format!("{} {}", row.metric, arrow),
            format_metric(row.first),
            format_metric(row.second),
            format!("{:+}", round3(row.diff)),
            better.to_string(),
        ]);
    }
    println!("{}", table);
    Ok(())
}

fn cmd_clusters(mut dashboard: Dashboard, provider: Option<String>) -> Result<()> {
    if let Some(provider) = provider {
        dashboard.multi_cloud.provider.select(provider.parse::<Provider>()?);
    }
    let clusters = &dashboard.catalog().clusters;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Cluster", "Provider", "Region", "Nodes", "Agents", "CPU", "Mem", "Status", "Eval"]);
    for c in dashboard.multi_cloud.visible(clusters) {
        table.add_row([
            c.name.clone(),
            c.provider.as_str().to_uppercase(),
            c.region.clone(),
            c.nodes.to_string(),
            c.agents.to_string(),
            format!("{}%", c.cpu_pct),
            format!("{}%", c.memory_pct),
            c.status.to_string(),
            format!("{:.1}", c.eval_score),
        ]);
    }
    println!("{}", table);

    let totals = MultiCloudView::totals(clusters);
    println!(
        "Healthy: {}/{}  Agents: {}  Avg eval: {}",
        totals.healthy_clusters,
        totals.total_clusters,
        totals.total_agents,
        totals.avg_eval_score.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".into()),
    );
    Ok(())
}

fn cmd_summary(dashboard: &Dashboard) {
    let s = dashboard.summary();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["Metric", "Value"]);
    let rows = [
        ("Active agents", s.active_agents.to_string()),
        ("Pending HITL tasks", s.pending_hitl_tasks.to_string()),
        ("Blocked actions", s.blocked_audit_entries.to_string()),
        ("Active policies", s.enabled_policies.to_string()),
        ("Connected integrations", s.connected_integrations.to_string()),
        ("Events processed", s.integration_events.to_string()),
        ("Healthy clusters", format!("{}/{}", s.healthy_clusters, s.total_clusters)),
        ("Cloud agents", s.cloud_agents.to_string()),
        (
            "Avg eval score",
            s.avg_eval_score.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".into()),
        ),
        ("Error traces", s.error_traces.to_string()),
        ("Degraded deployments", s.degraded_deployments.to_string()),
    ];
    for (label, value) in rows {
        table.add_row([label.to_string(), value]);
    }
    println!("{}", table);
}

// ─── Utilities ────────────────────────────────────────────────────────────────

fn parse_all<T>(raw: &[String]) -> Result<Vec<T>>
where
    T: FromStr<Err = AgentOpsError>,
{
    raw.iter()
        .map(|s| s.parse::<T>().map_err(anyhow::Error::from))
        .collect()
}

fn format_counts<C: Display>(counts: &BTreeMap<C, usize>) -> String {
    counts
        .iter()
        .map(|(category, n)| format!("{category}: {n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn timeline(left_pct: f64, width_pct: f64, cols: usize) -> String {
    let start = ((left_pct / 100.0) * cols as f64).round() as usize;
    let width = (((width_pct / 100.0) * cols as f64).round() as usize).max(1);
    let start = start.min(cols - 1);
    let width = width.min(cols - start);
    format!(
        "{}{}{}",
        " ".repeat(start),
        "█".repeat(width),
        " ".repeat(cols - start - width)
    )
}

fn format_metric(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", round3(value))
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
