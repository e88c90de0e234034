//! Dispatch of assistant database actions.

use mockable::Clock;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::context::ContextBuilder;
use super::domain::{AssistantContext, DatabaseActionRequest, SUPPORTED_ACTIONS};
use crate::credentials::domain::ConnectionConfig;
use crate::credentials::ports::KeyValueStore;
use crate::credentials::services::{CredentialVault, CredentialVaultError};
use crate::executor::domain::{ExecutionOutcome, SqlSanitizer};
use crate::executor::services::OperationExecutor;
use crate::platform::ports::{DataApiConnector, DataApiError};
use crate::schema::{SchemaError, SchemaInspector};

const OPERATION_TYPES: [&str; 5] = ["select", "insert", "update", "delete", "execute"];

/// Errors raised while serving assistant actions.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// No project connection is stored.
    #[error("no database connection is configured")]
    NotConnected,

    /// The credential vault failed.
    #[error(transparent)]
    Vault(#[from] CredentialVaultError),

    /// A data API handle could not be built.
    #[error(transparent)]
    Connect(#[from] DataApiError),

    /// Schema introspection failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The context template failed to render.
    #[error("failed to render database context: {reason}")]
    Render {
        /// Template engine message.
        reason: String,
    },
}

/// Result type for assistant actions.
pub type AssistantResult<T> = Result<T, AssistantError>;

struct Session<C>
where
    C: Clock + Send + Sync,
{
    connection: ConnectionConfig,
    executor: OperationExecutor,
    inspector: Arc<SchemaInspector<C>>,
}

impl<C> Clone for Session<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            executor: self.executor.clone(),
            inspector: Arc::clone(&self.inspector),
        }
    }
}

/// Serves assistant actions against the stored project connection.
///
/// The data API handle and schema cache are rebuilt whenever the stored
/// connection changes.
pub struct DatabaseAssistant<S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + Send + Sync,
{
    vault: CredentialVault<S>,
    connector: Arc<dyn DataApiConnector>,
    sanitizer: SqlSanitizer,
    clock: Arc<C>,
    cache_ttl: Duration,
    session: Mutex<Option<Session<C>>>,
    notes: RwLock<Option<String>>,
}

impl<S, C> DatabaseAssistant<S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates an assistant service.
    #[must_use]
    pub fn new(
        vault: CredentialVault<S>,
        connector: Arc<dyn DataApiConnector>,
        sanitizer: SqlSanitizer,
        clock: Arc<C>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            vault,
            connector,
            sanitizer,
            clock,
            cache_ttl,
            session: Mutex::new(None),
            notes: RwLock::new(None),
        }
    }

    /// Returns whether a project connection is stored.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Vault`] when the vault cannot be read.
    pub async fn is_connected(&self) -> AssistantResult<bool> {
        Ok(self.vault.connection().await?.is_some())
    }

    /// Handles one action.
    ///
    /// Failures of the requested database work are reported inside the
    /// returned value as `{success: false, error}`.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::NotConnected`] when no connection is stored,
    /// and other variants when the vault, connector or template fail.
    pub async fn handle(&self, request: DatabaseActionRequest) -> AssistantResult<Value> {
        let session = self.session().await?;
        match request {
            DatabaseActionRequest::GetCapabilities => Ok(json!({
                "success": true,
                "data": {
                    "actions": SUPPORTED_ACTIONS,
                    "operations": OPERATION_TYPES,
                    "project_url": session.connection.project_url().as_str(),
                },
            })),
            DatabaseActionRequest::GetSchema { refresh } => {
                if refresh {
                    session.inspector.invalidate().await;
                }
                let snapshot = session.inspector.snapshot().await?;
                let stats = session.inspector.stats().await?;
                Ok(json!({
                    "success": true,
                    "data": {
                        "tables": snapshot.tables,
                        "stats": stats,
                        "captured_at": snapshot.captured_at,
                    },
                }))
            }
            DatabaseActionRequest::ExecuteQuery { query } => {
                let outcome = match session.executor.execute_sql(&query).await {
                    Ok(data) => ExecutionOutcome::succeeded(data),
                    Err(err) => ExecutionOutcome::failed(err.to_string()),
                };
                if outcome.success {
                    session.inspector.invalidate().await;
                }
                Ok(to_value(&outcome))
            }
            DatabaseActionRequest::ExecuteOperation { operation } => {
                let outcome = session.executor.execute(&operation).await;
                if outcome.success && operation.kind() == "execute" {
                    session.inspector.invalidate().await;
                }
                Ok(to_value(&outcome))
            }
            DatabaseActionRequest::SetContext { context } => {
                let notes = match context {
                    Value::String(text) => text,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                debug!(length = notes.len(), "assistant notes updated");
                *self.notes.write().await = (!notes.is_empty()).then_some(notes);
                Ok(json!({ "success": true }))
            }
        }
    }

    /// Builds the context value for the prompt.
    ///
    /// A missing connection yields a disconnected context rather than an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError`] when the vault or introspection fail.
    pub async fn context(&self) -> AssistantResult<AssistantContext> {
        let session = match self.session().await {
            Ok(session) => session,
            Err(AssistantError::NotConnected) => return Ok(AssistantContext::disconnected()),
            Err(err) => return Err(err),
        };
        let snapshot = session.inspector.snapshot().await?;
        let stats = session.inspector.stats().await?;
        Ok(AssistantContext {
            connected: true,
            project_url: Some(session.connection.project_url().as_str().to_owned()),
            tables: snapshot.tables.clone(),
            stats: Some(stats),
            notes: self.notes.read().await.clone(),
        })
    }

    /// Renders the context block followed by the action instructions.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError`] as for [`Self::context`], or
    /// [`AssistantError::Render`] when the template fails.
    pub async fn prompt(&self) -> AssistantResult<String> {
        let context = self.context().await?;
        ContextBuilder
            .render_with_instructions(&context)
            .map_err(|error| AssistantError::Render {
                reason: error.to_string(),
            })
    }

    async fn session(&self) -> AssistantResult<Session<C>> {
        let connection = self
            .vault
            .connection()
            .await?
            .ok_or(AssistantError::NotConnected)?;
        let mut current = self.session.lock().await;
        if let Some(session) = current.as_ref()
            && session.connection == connection
        {
            return Ok(session.clone());
        }

        info!(project_url = %connection.project_url(), "opening assistant database session");
        let api = self.connector.connect(&connection)?;
        let session = Session {
            executor: OperationExecutor::new(Arc::clone(&api), self.sanitizer.clone()),
            inspector: Arc::new(SchemaInspector::new(
                api,
                Arc::clone(&self.clock),
                self.cache_ttl,
            )),
            connection,
        };
        *current = Some(session.clone());
        Ok(session)
    }
}

fn to_value(outcome: &ExecutionOutcome) -> Value {
    serde_json::to_value(outcome)
        .unwrap_or_else(|err| json!({ "success": false, "error": err.to_string() }))
}
