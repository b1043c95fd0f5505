//! Integration tests for the full check pipeline.
//!
//! These tests run both passes against the testdata fixtures and pin down
//! the finding order the engine guarantees.

use std::path::PathBuf;

use c9check::check::{FindingKind, RuleCatalog, Runner};
use c9check::policy::Policy;
use c9check::report;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn default_catalog() -> RuleCatalog {
    RuleCatalog::new(&Policy::default()).expect("default catalog should build")
}

#[test]
fn test_clean_fixture_reports_nothing() {
    let catalog = default_catalog();
    let report = Runner::new(&catalog).check_file(&testdata_path().join("clean.c"));

    assert!(report.error.is_none());
    assert!(
        report.findings.is_empty(),
        "clean fixture should be clean, got: {:?}",
        report.findings
    );
}

#[test]
fn test_symbol_fixture_findings_in_check_order() {
    let catalog = default_catalog();
    let report = Runner::new(&catalog).check_file(&testdata_path().join("undefined.c"));

    assert!(report.error.is_none());
    let kinds: Vec<FindingKind> = report.findings.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FindingKind::UndefinedFunction,
            FindingKind::UnusedAnnotation,
            FindingKind::UnusedFunction,
        ]
    );

    assert!(report.findings[0].message.contains("compute"));
    assert!(report.findings[1].message.contains("Widget"));
    assert!(report.findings[2].message.contains("run_once"));

    // Symbol findings describe the whole unit.
    assert!(report.findings.iter().all(|f| f.line.is_none()));
}

#[test]
fn test_style_fixture_rule_hits() {
    let catalog = default_catalog();
    let report = Runner::new(&catalog).check_file(&testdata_path().join("unstyled.c"));

    let hits: Vec<(usize, &str)> = report
        .findings
        .iter()
        .filter(|f| f.kind == FindingKind::Style)
        .map(|f| (f.line.unwrap(), f.rule.as_deref().unwrap()))
        .collect();

    assert_eq!(
        hits,
        vec![
            (4, "preprocessor"),
            (5, "preprocessor"),
            (6, "preprocessor"),
            (7, "preprocessor"),
            (9, "block-comment"),
            (11, "bare-aggregate"),
            (12, "integer-types"),
            (13, "integer-types"),
            (13, "size-keywords"),
            (17, "flexible-array"),
            (18, "variable-length-array"),
            (21, "no-parameters"),
            (22, "local-const"),
            (23, "short-name"),
            (24, "goto"),
            (26, "malloc"),
            (29, "split-definition"),
        ]
    );
}

#[test]
fn test_style_fixture_symbol_findings() {
    let catalog = default_catalog();
    let report = Runner::new(&catalog).check_file(&testdata_path().join("unstyled.c"));

    let symbols: Vec<(FindingKind, &str)> = report
        .findings
        .iter()
        .filter(|f| f.kind != FindingKind::Style)
        .map(|f| (f.kind, f.message.as_str()))
        .collect();

    assert_eq!(symbols.len(), 3);
    assert_eq!(symbols[0].0, FindingKind::UndefinedFunction);
    assert!(symbols[0].1.contains("malloc"));
    assert_eq!(symbols[1].0, FindingKind::UnusedType);
    assert!(symbols[1].1.contains("BadType"));
    assert_eq!(symbols[2].0, FindingKind::UnusedFunction);
    assert!(symbols[2].1.contains("noargs"));
}

#[test]
fn test_engine_is_idempotent() {
    let files: Vec<PathBuf> = ["clean.c", "undefined.c", "unstyled.c"]
        .iter()
        .map(|name| testdata_path().join(name))
        .collect();

    let catalog = default_catalog();
    let runner = Runner::new(&catalog);

    let render = |reports: &[c9check::FileReport]| {
        reports
            .iter()
            .map(report::render_text)
            .collect::<String>()
    };

    let first = render(&runner.run(&files));
    let second = render(&runner.run(&files));
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn test_io_failure_is_isolated_per_file() {
    let catalog = default_catalog();
    let runner = Runner::new(&catalog);

    let missing = testdata_path().join("no_such_file.c");
    let reports = runner.run(&[missing, testdata_path().join("clean.c")]);

    assert_eq!(reports.len(), 2);
    assert!(reports[0].error.as_deref().unwrap().contains("no_such_file.c"));
    assert!(reports[1].error.is_none());
    assert!(reports[1].findings.is_empty());
}

#[test]
fn test_disabled_rules_drop_their_findings() {
    let policy = Policy {
        disabled_rules: vec!["preprocessor".to_string(), "size-keywords".to_string()],
        ..Policy::default()
    };
    let catalog = RuleCatalog::new(&policy).unwrap();
    let report = Runner::new(&catalog).check_file(&testdata_path().join("unstyled.c"));

    let rules: Vec<&str> = report
        .findings
        .iter()
        .filter_map(|f| f.rule.as_deref())
        .collect();
    assert!(!rules.contains(&"preprocessor"));
    assert!(!rules.contains(&"size-keywords"));
    assert!(rules.contains(&"goto"));
}
