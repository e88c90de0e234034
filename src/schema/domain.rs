//! Introspected schema types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A column as reported by the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// SQL type.
    pub data_type: String,
    /// Whether `NULL` is allowed.
    pub is_nullable: bool,
    /// Default expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// A table and its columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    /// Table name.
    pub table: String,
    /// Columns in ordinal order.
    pub columns: Vec<ColumnInfo>,
}

/// All tables at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaSnapshot {
    /// Tables in the public schema.
    pub tables: Vec<SchemaInfo>,
    /// When the snapshot was taken.
    pub captured_at: DateTime<Utc>,
}

/// Summary figures for the assistant context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseStats {
    /// Number of tables in the public schema.
    pub table_count: usize,
    /// Human-readable database size, when the helper procedure exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_size: Option<String>,
}
