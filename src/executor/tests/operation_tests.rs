//! Unit tests for operation decoding and validation.

use crate::executor::domain::{DatabaseOperation, OperationError, PreparedOperation};
use crate::platform::domain::PlatformDomainError;
use rstest::rstest;
use serde_json::{Value, json};

fn decode(value: Value) -> DatabaseOperation {
    serde_json::from_value(value).expect("operation decodes")
}

#[rstest]
#[case(json!({ "type": "select" }), "select", "table")]
#[case(json!({ "type": "insert", "table": "todos" }), "insert", "data")]
#[case(json!({ "type": "update", "table": "todos", "data": { "done": true } }), "update", "filter")]
#[case(json!({ "type": "update", "table": "todos", "filter": { "id": 1 } }), "update", "data")]
#[case(json!({ "type": "delete", "table": "todos" }), "delete", "filter")]
#[case(json!({ "type": "execute" }), "execute", "query")]
#[case(json!({ "type": "execute", "query": "   " }), "execute", "query")]
fn missing_required_fields_are_named(
    #[case] raw: Value,
    #[case] operation: &'static str,
    #[case] field: &'static str,
) {
    assert_eq!(
        decode(raw).validate(),
        Err(OperationError::MissingField { operation, field })
    );
}

#[rstest]
fn update_with_empty_filter_is_rejected() {
    let operation = decode(json!({
        "type": "update",
        "table": "todos",
        "data": { "done": true },
        "filter": {}
    }));
    assert_eq!(
        operation.validate(),
        Err(OperationError::EmptyFilter {
            operation: "update"
        })
    );
}

#[rstest]
fn insert_data_must_be_rows() {
    let operation = decode(json!({ "type": "insert", "table": "todos", "data": 42 }));
    assert!(matches!(
        operation.validate(),
        Err(OperationError::InvalidData { operation: "insert", .. })
    ));
}

#[rstest]
fn table_names_must_be_identifiers() {
    let operation = decode(json!({ "type": "select", "table": "todos; drop table x" }));
    assert!(matches!(
        operation.validate(),
        Err(OperationError::InvalidTarget(PlatformDomainError::InvalidIdentifier(_)))
    ));
}

#[rstest]
fn select_prepares_query_with_defaults() {
    let operation = decode(json!({
        "type": "select",
        "table": "todos",
        "schema": "app",
        "filter": { "done": false },
        "limit": 10
    }));

    let Ok(PreparedOperation::Select(query)) = operation.prepare() else {
        panic!("expected a prepared select");
    };
    assert_eq!(query.target().table(), "todos");
    assert_eq!(query.target().schema(), Some("app"));
    assert_eq!(query.columns(), "*");
    assert_eq!(query.limit(), Some(10));
    assert!(!query.filter().is_empty());
}

#[rstest]
fn returning_defaults_to_false() {
    let operation = decode(json!({ "type": "delete", "table": "todos", "filter": { "id": 3 } }));
    assert!(matches!(
        operation.prepare(),
        Ok(PreparedOperation::Delete {
            returning: false,
            ..
        })
    ));
}

#[rstest]
fn unknown_operation_type_fails_to_decode() {
    let result = serde_json::from_value::<DatabaseOperation>(json!({ "type": "truncate" }));
    assert!(result.is_err());
}
