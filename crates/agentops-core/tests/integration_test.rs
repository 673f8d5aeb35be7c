//! Integration tests for agentops-core.

use std::cell::Cell;
use std::rc::Rc;

use agentops_core::models::LogLevel;
use agentops_core::views::LogStreamView;
use agentops_core::{
    AgentOpsError, Catalog, ComparisonSelection, Dashboard, DashboardConfig, PageId,
    PageVisibilityMap, RecordFilter, SelectOutcome, Slot, VisibilityStore,
};
use tempfile::TempDir;

fn builtin() -> Catalog {
    Catalog::builtin().expect("built-in catalog should parse")
}

#[test]
fn test_enabled_count_tracks_the_map() {
    let mut store = VisibilityStore::new();
    let ops = [
        PageId::Governance,
        PageId::Azure,
        PageId::Governance,
        PageId::Prompts,
        PageId::Dashboard,
    ];
    for (i, page) in ops.into_iter().enumerate() {
        if i % 2 == 0 {
            store.toggle(page);
        } else {
            store.set(page, false);
        }
        let map = store.visibility();
        let trues = map.iter().filter(|(_, on)| *on).count();
        assert_eq!(store.enabled_count(), trues);
        assert_eq!(map.iter().count(), 9, "key set must stay closed");
    }
}

#[test]
fn test_set_true_twice_matches_once() {
    let mut once = VisibilityStore::new();
    once.set(PageId::Evaluation, false);
    once.set(PageId::Evaluation, true);

    let mut twice = VisibilityStore::new();
    twice.set(PageId::Evaluation, false);
    twice.set(PageId::Evaluation, true);
    twice.set(PageId::Evaluation, true);

    assert_eq!(once.visibility(), twice.visibility());
}

#[test]
fn test_governance_toggle_scenario() {
    let mut store = VisibilityStore::new();
    let notified = Rc::new(Cell::new(0));
    let counter = Rc::clone(&notified);
    store.subscribe(move |_| counter.set(counter.get() + 1));

    assert_eq!(store.visibility(), PageVisibilityMap::default());
    store.toggle(PageId::Governance);
    assert_eq!(store.enabled_count(), 8);
    assert!(!store.visibility().governance);
    store.toggle(PageId::Governance);
    assert_eq!(store.enabled_count(), 9);
    assert_eq!(notified.get(), 2);
}

#[test]
fn test_level_filter_keeps_original_order() {
    let catalog = builtin();
    let filter = RecordFilter::new().with_categories([LogLevel::Error, LogLevel::Warn]);
    let ids: Vec<&str> = filter.apply(&catalog.logs).iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["4", "5", "9"]);
}

#[test]
fn test_no_active_levels_yields_nothing() {
    let catalog = builtin();
    let mut view = LogStreamView::new();
    for level in LogLevel::ALL {
        view.toggle_level(*level);
    }
    assert!(view.levels.is_empty());
    assert!(view.visible(&catalog.logs).is_empty());
}

#[test]
fn test_prompt_comparison_diffs() {
    let mut dashboard = Dashboard::new(&DashboardConfig::new()).unwrap();
    dashboard.prompts.toggle_compare("1");
    dashboard.prompts.toggle_compare("3");
    let cmp = dashboard.prompts.comparison(&dashboard.catalog().prompts);

    let accuracy = cmp.row("Accuracy").unwrap();
    assert_eq!((accuracy.first, accuracy.second), (94.2, 89.5));
    assert!((accuracy.diff - 4.7).abs() < 1e-9);

    let tokens = cmp.row("Token Usage").unwrap();
    assert_eq!(tokens.diff, -270.0);
    assert_eq!(cmp.rows.len(), 5);
}

#[test]
fn test_third_comparison_pick_is_ignored() {
    let mut sel = ComparisonSelection::new();
    sel.select("A");
    sel.select("B");
    assert_eq!(sel.select("C"), SelectOutcome::Full);
    assert_eq!(sel.ids(), ["A", "B"]);

    sel.deselect("B");
    assert_eq!(sel.select("C"), SelectOutcome::Added);
    assert_eq!(sel.ids(), ["A", "C"]);
}

#[test]
fn test_comparison_with_unknown_id_is_empty() {
    let catalog = builtin();
    let cmp = agentops_core::compare_selected(
        &catalog.prompts,
        &["1".to_string(), "42".to_string()],
    );
    assert!(cmp.rows.is_empty());
    assert_eq!(cmp.second, Slot::NotFound("42".to_string()));
}

#[test]
fn test_catalog_loads_from_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("catalog.yaml");
    std::fs::write(
        &path,
        r#"
policies:
  - { id: p1, name: Only Policy, description: test, type: audit, enabled: false, applied_to: [All Agents] }
"#,
    )
    .unwrap();

    let config = DashboardConfig::new()
        .with_data_path(&path)
        .with_disabled(PageId::MultiCloud);
    let dashboard = Dashboard::new(&config).unwrap();

    assert_eq!(dashboard.catalog().policies.len(), 1);
    assert!(dashboard.catalog().logs.is_empty());
    assert_eq!(dashboard.summary().enabled_policies, 0);
    assert_eq!(dashboard.summary().avg_eval_score, None);
    assert!(!dashboard.navigation().contains(&PageId::MultiCloud));
    assert!(dashboard.traces.selected_trace.get().is_none());
}

#[test]
fn test_missing_catalog_file_is_an_io_error() {
    let tmp = TempDir::new().unwrap();
    let config = DashboardConfig::new().with_data_path(tmp.path().join("absent.yaml"));
    let err = Dashboard::new(&config).unwrap_err();
    assert!(matches!(err, AgentOpsError::Io(_)));
}

#[test]
fn test_unknown_page_key_is_rejected() {
    let err = "billing".parse::<PageId>().unwrap_err();
    assert!(matches!(err, AgentOpsError::UnknownPage(_)));
    assert_eq!("multi-cloud".parse::<PageId>().unwrap(), PageId::MultiCloud);
}
