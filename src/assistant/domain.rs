//! Assistant-facing request and context types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::executor::domain::DatabaseOperation;
use crate::schema::{DatabaseStats, SchemaInfo};

/// Action names accepted by the database endpoint.
pub const SUPPORTED_ACTIONS: [&str; 5] = [
    "get_capabilities",
    "get_schema",
    "execute_query",
    "execute_operation",
    "set_context",
];

/// Fixed instructions appended to the assistant prompt.
pub const ACTION_INSTRUCTIONS: &str = r#"## Database actions

You can work with the connected database by sending JSON to POST /api/llm-database.
Every request has an "action" field:

- {"action": "get_capabilities"} lists the supported actions and operation types.
- {"action": "get_schema"} returns the tables, their columns, and database statistics.
  Add "refresh": true to bypass the schema cache.
- {"action": "execute_query", "query": "<SQL>"} runs raw SQL. Multiple statements and
  comments are allowed; dangerous statements (shell commands, server file access,
  role escalation) are rejected.
- {"action": "execute_operation", "operation": {...}} runs a structured operation.
  "operation.type" is one of "select", "insert", "update", "delete", "execute":
  - select: "table" is required; optional "columns", "filter", "limit", "schema".
  - insert: "table" and "data" (object or array of objects) are required.
  - update: "table", "data", and a non-empty "filter" are required.
  - delete: "table" and a non-empty "filter" are required.
  - execute: "query" is required.
  Filters map column names to values and match by equality.
  Set "returning": true to get affected rows back.
- {"action": "set_context", "context": "<notes>"} stores notes that are shown in this
  context block on later turns.

Results have the shape {"success": bool, "data"?: any, "error"?: string}.
Prefer structured operations over raw SQL for row changes, and always filter updates
and deletes."#;

/// A request sent by the assistant, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DatabaseActionRequest {
    /// Describe the supported actions.
    GetCapabilities,
    /// Describe the schema.
    GetSchema {
        /// Bypass the schema cache.
        #[serde(default)]
        refresh: bool,
    },
    /// Run raw SQL.
    ExecuteQuery {
        /// SQL text.
        query: String,
    },
    /// Run a structured operation.
    ExecuteOperation {
        /// The operation.
        operation: DatabaseOperation,
    },
    /// Store notes for later context blocks.
    SetContext {
        /// Notes, as text or any JSON value.
        context: Value,
    },
}

/// Everything the context template renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssistantContext {
    /// Whether a project connection is configured.
    pub connected: bool,
    /// Connected project URL.
    pub project_url: Option<String>,
    /// Tables and columns.
    pub tables: Vec<SchemaInfo>,
    /// Summary statistics.
    pub stats: Option<DatabaseStats>,
    /// Notes stored through `set_context`.
    pub notes: Option<String>,
}

impl AssistantContext {
    /// Context for when no project is connected.
    #[must_use]
    pub fn disconnected() -> Self {
        Self::default()
    }
}
