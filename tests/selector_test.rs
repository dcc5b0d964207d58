use macmaint::common::config::RunConfiguration;
use macmaint::registry::selector::resolve_selection;
use macmaint::registry::{Registry, RiskLevel};

// ─── Subsequence property ────────────────────────────────────────────────────

#[test]
fn test_skip_yields_strict_subsequence() {
    let registry = Registry::new();
    let config = RunConfiguration {
        skip_set: vec!["log-clean".into()],
        ..Default::default()
    };
    let selection = resolve_selection(&registry, &config).unwrap();
    let selected: Vec<_> = selection.iter().map(|d| d.id).collect();

    assert_eq!(selected.len(), registry.list().len() - 1);
    assert!(!selected.contains(&"log-clean"));

    // remaining ids appear exactly as in the catalogue, gap excepted
    let expected: Vec<_> = registry
        .list()
        .iter()
        .map(|d| d.id)
        .filter(|id| *id != "log-clean")
        .collect();
    assert_eq!(selected, expected);
}

#[test]
fn test_combined_filters_preserve_catalogue_order() {
    let registry = Registry::new();
    let config = RunConfiguration {
        risk_filter: Some(RiskLevel::Medium),
        skip_set: vec!["sqlite-vacuum".into()],
        ..Default::default()
    };
    let selection = resolve_selection(&registry, &config).unwrap();

    let catalogue_pos = |id: &str| registry.list().iter().position(|d| d.id == id).unwrap();
    for pair in selection.windows(2) {
        assert!(
            catalogue_pos(pair[0].id) < catalogue_pos(pair[1].id),
            "{} must precede {}",
            pair[0].id,
            pair[1].id
        );
    }
}

// ─── Empty selection is a valid outcome ──────────────────────────────────────

#[test]
fn test_filters_that_exclude_everything_succeed() {
    let registry = Registry::new();
    let high_ids: Vec<String> = registry
        .list()
        .iter()
        .filter(|d| d.risk == RiskLevel::High)
        .map(|d| d.id.to_string())
        .collect();
    assert!(!high_ids.is_empty());

    let config = RunConfiguration {
        risk_filter: Some(RiskLevel::High),
        skip_set: high_ids,
        ..Default::default()
    };
    let selection = resolve_selection(&registry, &config).unwrap();
    assert!(selection.is_empty());
}

// ─── Single-operation mode ───────────────────────────────────────────────────

#[test]
fn test_single_operation_ignores_other_filters() {
    let registry = Registry::new();
    let config = RunConfiguration {
        single_operation: Some("network-reset".into()),
        risk_filter: Some(RiskLevel::Low),
        skip_set: vec!["network-reset".into()],
        ..Default::default()
    };
    let selection = resolve_selection(&registry, &config).unwrap();
    assert_eq!(selection.len(), 1);
    assert_eq!(selection[0].id, "network-reset");
}

#[test]
fn test_skipping_unknown_id_is_harmless() {
    let registry = Registry::new();
    let config = RunConfiguration {
        skip_set: vec!["no-such-operation".into()],
        ..Default::default()
    };
    let selection = resolve_selection(&registry, &config).unwrap();
    assert_eq!(selection.len(), registry.list().len());
}
