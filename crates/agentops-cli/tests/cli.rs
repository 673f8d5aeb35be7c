//! End-to-end tests for the `agentops` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn agentops() -> Command {
    Command::cargo_bin("agentops").unwrap()
}

#[test]
fn test_pages_lists_every_page() {
    agentops()
        .arg("pages")
        .assert()
        .success()
        .stdout(predicate::str::contains("insights-tower"))
        .stdout(predicate::str::contains("9 of 9 pages enabled"));
}

#[test]
fn test_pages_disable_and_only() {
    agentops()
        .args(["pages", "--disable", "governance", "--disable", "azure"])
        .assert()
        .success()
        .stdout(predicate::str::contains("7 of 9 pages enabled"));

    agentops()
        .args(["pages", "--only", "prompts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Navigation: Prompt Studio"))
        .stdout(predicate::str::contains("1 of 9 pages enabled"));
}

#[test]
fn test_unknown_page_fails() {
    agentops()
        .args(["pages", "--disable", "billing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown page: billing"));
}

#[test]
fn test_logs_filter_by_level_as_json() {
    let output = agentops()
        .args(["logs", "--level", "error", "--level", "warn", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let logs: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = logs
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["4", "5", "9"]);
}

#[test]
fn test_logs_search_table() {
    agentops()
        .args(["logs", "--search", "slack"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NotificationAgent"))
        .stdout(predicate::str::contains("1 of 10 entries"));
}

#[test]
fn test_waterfall_default_trace() {
    agentops()
        .arg("waterfall")
        .assert()
        .success()
        .stdout(predicate::str::contains("trace-001"))
        .stdout(predicate::str::contains("LLM Inference"));
}

#[test]
fn test_waterfall_unknown_trace_fails() {
    agentops()
        .args(["waterfall", "trace-999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("trace-999"));
}

#[test]
fn test_policies_toggle_updates_count() {
    agentops()
        .args(["policies", "--toggle", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Active policies: 6 of 6"));
}

#[test]
fn test_audit_blocked_only() {
    agentops()
        .args(["audit", "--status", "blocked"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DataAgent"))
        .stdout(predicate::str::contains("admin@company.com").not());
}

#[test]
fn test_compare_prompts() {
    agentops()
        .args(["compare", "1", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+4.7"))
        .stdout(predicate::str::contains("-270"));
}

#[test]
fn test_compare_missing_prompt_fails() {
    agentops()
        .args(["compare", "1", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found: 99"));
}

#[test]
fn test_clusters_by_provider() {
    agentops()
        .args(["clusters", "--provider", "gcp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GKE Europe"))
        .stdout(predicate::str::contains("EKS Europe").not());
}

#[test]
fn test_summary_with_custom_catalog() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.yaml");
    std::fs::write(
        &path,
        "hitl_tasks:\n  - { id: h1, title: Approve, agent: A, priority: P1, status: pending, requested: now }\n",
    )
    .unwrap();

    agentops()
        .args(["--data", path.to_str().unwrap(), "summary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending HITL tasks"))
        .stdout(predicate::str::contains("Avg eval score"));
}

#[test]
fn test_page_keys_are_case_insensitive() {
    agentops()
        .args(["pages", "--disable", "Governance"])
        .assert()
        .success()
        .stdout(predicate::str::contains("8 of 9 pages enabled"));
}

#[test]
fn test_waterfall_with_oversized_span_does_not_crash() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.yaml");
    std::fs::write(
        &path,
        "traces:\n  - { id: t1, name: Huge, service: S, status: success, duration_ms: 1, timestamp: now, spans: 1, agent: A }\n\
         spans:\n  - { id: s1, trace_id: t1, name: Giant Span, service: S, duration_ms: 18446744073709551615, start_offset_ms: 1, status: success, type: agent }\n",
    )
    .unwrap();

    agentops()
        .args(["--data", path.to_str().unwrap(), "waterfall"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Giant Span"));
}

#[test]
fn test_json_catalog() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"{"hitl_tasks": [{"id": "h9", "title": "Approve rollout", "agent": "DeployAgent", "priority": "P2", "status": "pending", "requested": "now"}]}"#,
    )
    .unwrap();

    agentops()
        .args(["--data", path.to_str().unwrap(), "hitl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Approve rollout"));
}

#[test]
fn test_hitl_pending_queue() {
    agentops()
        .args(["hitl", "--status", "pending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hitl-4"))
        .stdout(predicate::str::contains("hitl-5").not());
}

#[test]
fn test_integrations_and_agents_filters() {
    agentops()
        .args(["integrations", "--status", "disconnected"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Zendesk"))
        .stdout(predicate::str::contains("PagerDuty").not());

    agentops()
        .args(["agents", "--status", "idle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AnalyticsAgent"))
        .stdout(predicate::str::contains("IncidentClassifier").not());
}

#[test]
fn test_insights_by_type() {
    agentops()
        .args(["insights", "--type", "success"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Self-improvement applied"))
        .stdout(predicate::str::contains("Token usage spike").not());
}

#[test]
fn test_azure_deployment_filter() {
    agentops()
        .args(["azure", "--deployment-status", "degraded"])
        .assert()
        .success()
        .stdout(predicate::str::contains("agentops-prod-eastus"))
        .stdout(predicate::str::contains("Under-replicated: knowledge-agent"))
        .stdout(predicate::str::contains("notification-agent").not());
}
