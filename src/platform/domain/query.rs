//! Data API query descriptions.

use super::PlatformDomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Validates a SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`).
///
/// # Errors
///
/// Returns [`PlatformDomainError::InvalidIdentifier`] for anything else.
pub(crate) fn validate_identifier(value: &str) -> Result<String, PlatformDomainError> {
    let trimmed = value.trim();
    let mut chars = trimmed.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !starts_well || !rest_ok {
        return Err(PlatformDomainError::InvalidIdentifier(value.to_owned()));
    }
    Ok(trimmed.to_owned())
}

/// Equality filter over columns.
///
/// Each entry becomes a `column=eq.value` query parameter; `null` becomes
/// `column=is.null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(BTreeMap<String, Value>);

impl Filter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition.
    #[must_use]
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// Returns `true` when no condition is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the conditions as REST query parameters.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(column, value)| {
                let rendered = match value {
                    Value::Null => "is.null".to_owned(),
                    Value::String(text) => format!("eq.{text}"),
                    other => format!("eq.{other}"),
                };
                (column.clone(), rendered)
            })
            .collect()
    }
}

/// A table within an optional schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableTarget {
    schema: Option<String>,
    table: String,
}

impl TableTarget {
    /// Creates a validated table target in the default schema.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformDomainError::InvalidIdentifier`] for malformed
    /// table names.
    pub fn new(table: &str) -> Result<Self, PlatformDomainError> {
        Ok(Self {
            schema: None,
            table: validate_identifier(table)?,
        })
    }

    /// Places the table in an explicit schema.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformDomainError::InvalidIdentifier`] for malformed
    /// schema names.
    pub fn in_schema(mut self, schema: &str) -> Result<Self, PlatformDomainError> {
        self.schema = Some(validate_identifier(schema)?);
        Ok(self)
    }

    /// Returns the schema, if explicit.
    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }
}

/// A read against one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    target: TableTarget,
    columns: String,
    filter: Filter,
    limit: Option<u32>,
}

impl SelectQuery {
    /// Selects all columns from `target`.
    #[must_use]
    pub fn new(target: TableTarget) -> Self {
        Self {
            target,
            columns: "*".to_owned(),
            filter: Filter::new(),
            limit: None,
        }
    }

    /// Restricts the selected columns (`select=` syntax).
    #[must_use]
    pub fn with_columns(mut self, columns: impl Into<String>) -> Self {
        let value = columns.into();
        if !value.trim().is_empty() {
            self.columns = value.trim().to_owned();
        }
        self
    }

    /// Applies an equality filter.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Caps the number of returned rows.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the target table.
    #[must_use]
    pub const fn target(&self) -> &TableTarget {
        &self.target
    }

    /// Returns the `select=` column list.
    #[must_use]
    pub fn columns(&self) -> &str {
        &self.columns
    }

    /// Returns the filter.
    #[must_use]
    pub const fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Returns the row limit.
    #[must_use]
    pub const fn limit(&self) -> Option<u32> {
        self.limit
    }
}
