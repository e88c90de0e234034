//! Validated dispatch of database operations.

use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::executor::domain::{
    DatabaseOperation, ExecutionOutcome, OperationError, PreparedOperation, SqlSanitizer,
    TableDefinition, TableSqlError, generate_table_sql,
};
use crate::platform::ports::{DataApi, DataApiError};

/// Procedure used for raw SQL before falling back to the SQL endpoint.
pub const EXEC_SQL_FUNCTION: &str = "exec_sql";

/// Service-level errors for operation execution.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The operation failed validation; nothing was sent.
    #[error(transparent)]
    Invalid(#[from] OperationError),

    /// A table definition could not be rendered.
    #[error(transparent)]
    TableSql(#[from] TableSqlError),

    /// The data API rejected the request.
    #[error(transparent)]
    Remote(#[from] DataApiError),
}

/// Result type for executor operations.
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Executes operations against one project's data API.
#[derive(Clone)]
pub struct OperationExecutor {
    api: Arc<dyn DataApi>,
    sanitizer: SqlSanitizer,
}

impl OperationExecutor {
    /// Creates an executor over `api`.
    #[must_use]
    pub const fn new(api: Arc<dyn DataApi>, sanitizer: SqlSanitizer) -> Self {
        Self { api, sanitizer }
    }

    /// Executes `operation`, folding every failure into the outcome.
    pub async fn execute(&self, operation: &DatabaseOperation) -> ExecutionOutcome {
        match self.try_execute(operation).await {
            Ok(data) => ExecutionOutcome::succeeded(data),
            Err(err) => {
                debug!(operation = operation.kind(), error = %err, "operation failed");
                ExecutionOutcome::failed(err.to_string())
            }
        }
    }

    /// Executes `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::Invalid`] before any network call when the
    /// operation is incomplete or its SQL hits the denylist, and
    /// [`ExecutorError::Remote`] when the data API fails.
    pub async fn try_execute(&self, operation: &DatabaseOperation) -> ExecutorResult<Value> {
        match operation.prepare()? {
            PreparedOperation::Select(query) => Ok(self.api.select(&query).await?),
            PreparedOperation::Insert {
                target,
                rows,
                returning,
            } => Ok(self.api.insert(&target, &rows, returning).await?),
            PreparedOperation::Update {
                target,
                filter,
                data,
                returning,
            } => Ok(self.api.update(&target, &filter, &data, returning).await?),
            PreparedOperation::Delete {
                target,
                filter,
                returning,
            } => Ok(self.api.delete(&target, &filter, returning).await?),
            PreparedOperation::Execute(query) => self.execute_sql(&query).await,
        }
    }

    /// Runs raw SQL after the denylist check.
    ///
    /// The `exec_sql` procedure is tried first; the generic SQL endpoint is
    /// called only when that procedure call fails.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::Invalid`] for denied SQL and
    /// [`ExecutorError::Remote`] with the fallback's error when both paths
    /// fail.
    pub async fn execute_sql(&self, query: &str) -> ExecutorResult<Value> {
        self.sanitizer.check(query).map_err(OperationError::from)?;
        match self
            .api
            .rpc(EXEC_SQL_FUNCTION, &json!({ "query": query }))
            .await
        {
            Ok(result) => Ok(result),
            Err(rpc_error) => {
                warn!(error = %rpc_error, "exec_sql procedure failed; using SQL endpoint");
                Ok(self.api.sql(query).await?)
            }
        }
    }

    /// Creates a table from a definition.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError::TableSql`] when the definition is invalid,
    /// otherwise as [`Self::execute_sql`].
    pub async fn create_table(&self, definition: &TableDefinition) -> ExecutorResult<Value> {
        let sql = generate_table_sql(definition)?;
        self.execute_sql(&sql).await
    }
}
