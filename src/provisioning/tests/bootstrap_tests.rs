//! Unit tests for bootstrap script handling and backoff timing.

use std::time::Duration;

use crate::provisioning::domain::{
    BackoffPolicy, BootstrapFailure, BootstrapReport, bootstrap_steps, split_steps,
};
use rstest::rstest;

#[rstest]
fn bundled_script_defines_introspection_helpers() {
    let names: Vec<String> = bootstrap_steps().into_iter().map(|step| step.name).collect();

    for expected in ["get_tables", "get_table_columns", "get_database_size", "exec_sql"] {
        assert!(names.iter().any(|name| name == expected), "missing {expected}");
    }
}

#[rstest]
fn steps_split_on_markers() {
    let script = "-- preamble\nselect 0;\n-- step: one\nselect 1;\n\n-- step: empty\n\n-- step: two\nselect 2;\nselect 3;\n";

    let steps = split_steps(script);

    assert_eq!(steps.len(), 2);
    assert_eq!(steps.first().map(|s| s.name.as_str()), Some("one"));
    assert_eq!(steps.last().map(|s| s.sql.as_str()), Some("select 2;\nselect 3;"));
}

#[rstest]
fn report_is_complete_without_failures() {
    let mut report = BootstrapReport {
        applied: vec!["one".to_owned()],
        failed: Vec::new(),
    };
    assert!(report.is_complete());

    report.failed.push(BootstrapFailure {
        step: "two".to_owned(),
        error: "boom".to_owned(),
    });
    assert!(!report.is_complete());
}

#[rstest]
#[case(0, 100)]
#[case(1, 200)]
#[case(2, 400)]
#[case(3, 500)]
#[case(40, 500)]
fn backoff_doubles_up_to_ceiling(#[case] retry: u32, #[case] expected_ms: u64) {
    let policy = BackoffPolicy {
        initial_delay: Duration::from_millis(100),
        max_delay: Duration::from_millis(500),
        max_retries: 3,
    };
    assert_eq!(policy.delay_for(retry), Duration::from_millis(expected_ms));
}
