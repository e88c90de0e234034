//! Structured operations and their validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::sanitizer::ForbiddenQuery;
use crate::platform::domain::{Filter, PlatformDomainError, SelectQuery, TableTarget};

/// An operation requested by the assistant, tagged by `type`.
///
/// Fields are optional on the wire so that missing ones produce a
/// descriptive [`OperationError`] instead of a decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatabaseOperation {
    /// Read rows.
    Select {
        /// Table to read.
        table: Option<String>,
        /// Schema, when not `public`.
        schema: Option<String>,
        /// Column list (`*` when absent).
        columns: Option<String>,
        /// Equality filter.
        filter: Option<Filter>,
        /// Row limit.
        limit: Option<u32>,
    },
    /// Insert one row (object) or many (array).
    Insert {
        /// Target table.
        table: Option<String>,
        /// Schema, when not `public`.
        schema: Option<String>,
        /// Row data.
        data: Option<Value>,
        /// Return inserted rows.
        #[serde(default)]
        returning: bool,
    },
    /// Update rows matching a filter.
    Update {
        /// Target table.
        table: Option<String>,
        /// Schema, when not `public`.
        schema: Option<String>,
        /// Column values to set.
        data: Option<Value>,
        /// Rows to update.
        filter: Option<Filter>,
        /// Return updated rows.
        #[serde(default)]
        returning: bool,
    },
    /// Delete rows matching a filter.
    Delete {
        /// Target table.
        table: Option<String>,
        /// Schema, when not `public`.
        schema: Option<String>,
        /// Rows to delete.
        filter: Option<Filter>,
        /// Return deleted rows.
        #[serde(default)]
        returning: bool,
    },
    /// Run raw SQL.
    Execute {
        /// SQL text.
        query: Option<String>,
    },
}

/// Validation failures, raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// A required field is absent.
    #[error("{operation} operation requires `{field}`")]
    MissingField {
        /// Operation type.
        operation: &'static str,
        /// Missing field.
        field: &'static str,
    },

    /// A filter is present but has no conditions.
    #[error("{operation} operation requires a non-empty `filter`")]
    EmptyFilter {
        /// Operation type.
        operation: &'static str,
    },

    /// Row data has the wrong shape.
    #[error("{operation} operation `data` must be {expected}")]
    InvalidData {
        /// Operation type.
        operation: &'static str,
        /// Expected shape.
        expected: &'static str,
    },

    /// Table or schema name is not an identifier.
    #[error(transparent)]
    InvalidTarget(#[from] PlatformDomainError),

    /// Raw SQL hit the denylist.
    #[error(transparent)]
    Forbidden(#[from] ForbiddenQuery),
}

/// A validated operation ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum PreparedOperation {
    /// Validated select.
    Select(SelectQuery),
    /// Validated insert.
    Insert {
        /// Target table.
        target: TableTarget,
        /// Row or rows.
        rows: Value,
        /// Return inserted rows.
        returning: bool,
    },
    /// Validated update.
    Update {
        /// Target table.
        target: TableTarget,
        /// Rows to update.
        filter: Filter,
        /// Column values.
        data: Value,
        /// Return updated rows.
        returning: bool,
    },
    /// Validated delete.
    Delete {
        /// Target table.
        target: TableTarget,
        /// Rows to delete.
        filter: Filter,
        /// Return deleted rows.
        returning: bool,
    },
    /// Raw SQL, not yet checked against the denylist.
    Execute(String),
}

impl DatabaseOperation {
    /// Name of the operation type as it appears on the wire.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Select { .. } => "select",
            Self::Insert { .. } => "insert",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Execute { .. } => "execute",
        }
    }

    /// Checks the required fields for this operation type.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError`] describing the first problem found.
    pub fn validate(&self) -> Result<(), OperationError> {
        self.prepare().map(|_| ())
    }

    /// Validates and converts into a [`PreparedOperation`].
    ///
    /// Required fields: select needs `table`; insert needs `table` and
    /// `data`; update needs `table`, `data`, and `filter`; delete needs
    /// `table` and `filter`; execute needs `query`.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError`] describing the first problem found.
    pub fn prepare(&self) -> Result<PreparedOperation, OperationError> {
        let operation = self.kind();
        match self {
            Self::Select {
                table,
                schema,
                columns,
                filter,
                limit,
            } => {
                let target = resolve_target(operation, table.as_deref(), schema.as_deref())?;
                let mut query = SelectQuery::new(target)
                    .with_filter(filter.clone().unwrap_or_default());
                if let Some(selected) = columns {
                    query = query.with_columns(selected.clone());
                }
                if let Some(rows) = limit {
                    query = query.with_limit(*rows);
                }
                Ok(PreparedOperation::Select(query))
            }
            Self::Insert {
                table,
                schema,
                data,
                returning,
            } => {
                let target = resolve_target(operation, table.as_deref(), schema.as_deref())?;
                let rows = required(operation, "data", data.as_ref())?;
                if !(rows.is_object() || rows.is_array()) {
                    return Err(OperationError::InvalidData {
                        operation,
                        expected: "an object or an array of objects",
                    });
                }
                Ok(PreparedOperation::Insert {
                    target,
                    rows: rows.clone(),
                    returning: *returning,
                })
            }
            Self::Update {
                table,
                schema,
                data,
                filter,
                returning,
            } => {
                let target = resolve_target(operation, table.as_deref(), schema.as_deref())?;
                let values = required(operation, "data", data.as_ref())?;
                if !values.is_object() {
                    return Err(OperationError::InvalidData {
                        operation,
                        expected: "an object",
                    });
                }
                let conditions = non_empty_filter(operation, filter.as_ref())?;
                Ok(PreparedOperation::Update {
                    target,
                    filter: conditions,
                    data: values.clone(),
                    returning: *returning,
                })
            }
            Self::Delete {
                table,
                schema,
                filter,
                returning,
            } => {
                let target = resolve_target(operation, table.as_deref(), schema.as_deref())?;
                let conditions = non_empty_filter(operation, filter.as_ref())?;
                Ok(PreparedOperation::Delete {
                    target,
                    filter: conditions,
                    returning: *returning,
                })
            }
            Self::Execute { query } => {
                let sql = required(operation, "query", query.as_ref())?;
                if sql.trim().is_empty() {
                    return Err(OperationError::MissingField {
                        operation,
                        field: "query",
                    });
                }
                Ok(PreparedOperation::Execute(sql.clone()))
            }
        }
    }
}

const fn required<'a, T>(
    operation: &'static str,
    field: &'static str,
    value: Option<&'a T>,
) -> Result<&'a T, OperationError> {
    match value {
        Some(present) => Ok(present),
        None => Err(OperationError::MissingField { operation, field }),
    }
}

fn resolve_target(
    operation: &'static str,
    table: Option<&str>,
    schema: Option<&str>,
) -> Result<TableTarget, OperationError> {
    let name = table
        .filter(|name| !name.trim().is_empty())
        .ok_or(OperationError::MissingField {
            operation,
            field: "table",
        })?;
    let unscoped = TableTarget::new(name)?;
    match schema.filter(|value| !value.trim().is_empty()) {
        Some(scope) => Ok(unscoped.in_schema(scope)?),
        None => Ok(unscoped),
    }
}

fn non_empty_filter(
    operation: &'static str,
    filter: Option<&Filter>,
) -> Result<Filter, OperationError> {
    let conditions = required(operation, "filter", filter)?;
    if conditions.is_empty() {
        return Err(OperationError::EmptyFilter { operation });
    }
    Ok(conditions.clone())
}
