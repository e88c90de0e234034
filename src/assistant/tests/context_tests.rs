//! Tests for prompt rendering and action decoding.

use rstest::rstest;
use serde_json::json;

use crate::assistant::{ACTION_INSTRUCTIONS, AssistantContext, ContextBuilder, DatabaseActionRequest};
use crate::executor::domain::DatabaseOperation;
use crate::schema::{ColumnInfo, DatabaseStats, SchemaInfo};

fn todos_context() -> AssistantContext {
    AssistantContext {
        connected: true,
        project_url: Some("https://abcdefghijklmnopqrst.supabase.co".to_owned()),
        tables: vec![SchemaInfo {
            table: "todos".to_owned(),
            columns: vec![
                ColumnInfo {
                    name: "id".to_owned(),
                    data_type: "uuid".to_owned(),
                    is_nullable: false,
                    default_value: Some("gen_random_uuid()".to_owned()),
                },
                ColumnInfo {
                    name: "title".to_owned(),
                    data_type: "text".to_owned(),
                    is_nullable: true,
                    default_value: None,
                },
            ],
        }],
        stats: Some(DatabaseStats {
            table_count: 1,
            database_size: Some("8192 bytes".to_owned()),
        }),
        notes: Some("todos belong to users".to_owned()),
    }
}

#[rstest]
fn connected_context_lists_tables_and_columns() {
    let block = ContextBuilder.render(&todos_context()).expect("render");

    assert!(block.contains("Connected project: https://abcdefghijklmnopqrst.supabase.co"));
    assert!(block.contains("Tables: 1 | Database size: 8192 bytes"));
    assert!(block.contains("- todos: id uuid not null default gen_random_uuid(), title text"));
    assert!(block.contains("Notes: todos belong to users"));
}

#[rstest]
fn empty_database_is_called_out() {
    let context = AssistantContext {
        tables: Vec::new(),
        notes: None,
        ..todos_context()
    };

    let block = ContextBuilder.render(&context).expect("render");

    assert!(block.contains("The database has no tables yet."));
    assert!(!block.contains("Notes:"));
}

#[rstest]
fn disconnected_context_asks_for_a_connection() {
    let block = ContextBuilder
        .render(&AssistantContext::disconnected())
        .expect("render");

    assert!(block.contains("No database is connected."));
    assert!(!block.contains("Connected project"));
}

#[rstest]
fn instructions_follow_the_context_block() {
    let prompt = ContextBuilder
        .render_with_instructions(&todos_context())
        .expect("render");

    assert!(prompt.starts_with("## Database context"));
    assert!(prompt.ends_with(ACTION_INSTRUCTIONS));
}

#[rstest]
#[case(json!({ "action": "get_capabilities" }), DatabaseActionRequest::GetCapabilities)]
#[case(json!({ "action": "get_schema" }), DatabaseActionRequest::GetSchema { refresh: false })]
#[case(
    json!({ "action": "execute_query", "query": "select 1" }),
    DatabaseActionRequest::ExecuteQuery { query: "select 1".to_owned() }
)]
#[case(
    json!({ "action": "set_context", "context": "notes" }),
    DatabaseActionRequest::SetContext { context: json!("notes") }
)]
fn actions_decode_by_tag(#[case] body: serde_json::Value, #[case] expected: DatabaseActionRequest) {
    let decoded: DatabaseActionRequest = serde_json::from_value(body).expect("decode");
    assert_eq!(decoded, expected);
}

#[rstest]
fn operations_nest_inside_execute_operation() {
    let decoded: DatabaseActionRequest = serde_json::from_value(json!({
        "action": "execute_operation",
        "operation": { "type": "select", "table": "todos", "limit": 5 }
    }))
    .expect("decode");

    let DatabaseActionRequest::ExecuteOperation { operation } = decoded else {
        panic!("expected execute_operation, got {decoded:?}");
    };
    assert!(matches!(
        operation,
        DatabaseOperation::Select { table: Some(ref table), limit: Some(5), .. } if table == "todos"
    ));
}

#[rstest]
fn unknown_actions_are_rejected() {
    let decoded = serde_json::from_value::<DatabaseActionRequest>(json!({ "action": "drop_everything" }));
    assert!(decoded.is_err());
}
