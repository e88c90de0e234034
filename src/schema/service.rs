//! Schema inspector over the data API.

use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use super::domain::{ColumnInfo, DatabaseStats, SchemaInfo, SchemaSnapshot};
use crate::platform::{
    domain::{Filter, SelectQuery, TableTarget},
    ports::{DataApi, DataApiError, DataApiResult},
};

/// Default staleness window for cached snapshots.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

const INTROSPECTED_SCHEMA: &str = "public";

/// Errors raised while introspecting.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The data API failed with something other than an empty-state code.
    #[error(transparent)]
    Remote(#[from] DataApiError),

    /// The catalog answered with rows of an unexpected shape.
    #[error("unexpected catalog response: {0}")]
    Decode(String),
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Reads tables and columns, caching the full snapshot.
pub struct SchemaInspector<C>
where
    C: Clock + Send + Sync,
{
    api: Arc<dyn DataApi>,
    clock: Arc<C>,
    ttl: Duration,
    cache: RwLock<Option<Arc<SchemaSnapshot>>>,
    generation: AtomicU64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TableRow {
    Name(String),
    Record {
        #[serde(alias = "name")]
        table_name: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Nullability {
    Flag(bool),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct ColumnRow {
    #[serde(alias = "name")]
    column_name: String,
    #[serde(alias = "type")]
    data_type: String,
    is_nullable: Option<Nullability>,
    #[serde(alias = "default_value")]
    column_default: Option<String>,
}

impl From<ColumnRow> for ColumnInfo {
    fn from(row: ColumnRow) -> Self {
        let is_nullable = match row.is_nullable {
            Some(Nullability::Flag(flag)) => flag,
            Some(Nullability::Text(text)) => !text.eq_ignore_ascii_case("no"),
            None => true,
        };
        Self {
            name: row.column_name,
            data_type: row.data_type,
            is_nullable,
            default_value: row.column_default,
        }
    }
}

impl<C> SchemaInspector<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an inspector with an empty cache.
    #[must_use]
    pub fn new(api: Arc<dyn DataApi>, clock: Arc<C>, ttl: Duration) -> Self {
        Self {
            api,
            clock,
            ttl,
            cache: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Lists tables in the public schema.
    ///
    /// Tries the `get_tables` procedure, then the information schema. When
    /// neither exists the database is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] for failures other than missing catalog
    /// objects.
    pub async fn tables(&self) -> SchemaResult<Vec<String>> {
        let rows = match self.api.rpc("get_tables", &json!({})).await {
            Ok(rows) => rows,
            Err(err) if is_empty_state(&err) => {
                debug!(error = %err, "get_tables unavailable; reading information schema");
                let query = catalog_query("tables", "table_name", Filter::new())?;
                match empty_on_missing(self.api.select(&query).await)? {
                    Some(rows) => rows,
                    None => return Ok(Vec::new()),
                }
            }
            Err(err) => return Err(err.into()),
        };
        let parsed: Vec<TableRow> = decode_rows(rows)?;
        Ok(parsed
            .into_iter()
            .map(|row| match row {
                TableRow::Name(name) | TableRow::Record { table_name: name } => name,
            })
            .collect())
    }

    /// Lists the columns of `table`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] for failures other than missing catalog
    /// objects.
    pub async fn columns(&self, table: &str) -> SchemaResult<Vec<ColumnInfo>> {
        let rows = match self
            .api
            .rpc("get_table_columns", &json!({ "table_name": table }))
            .await
        {
            Ok(rows) => rows,
            Err(err) if is_empty_state(&err) => {
                debug!(table, error = %err, "get_table_columns unavailable; reading information schema");
                let query = catalog_query(
                    "columns",
                    "column_name,data_type,is_nullable,column_default",
                    Filter::new().eq("table_name", table),
                )?;
                match empty_on_missing(self.api.select(&query).await)? {
                    Some(rows) => rows,
                    None => return Ok(Vec::new()),
                }
            }
            Err(err) => return Err(err.into()),
        };
        let parsed: Vec<ColumnRow> = decode_rows(rows)?;
        Ok(parsed.into_iter().map(ColumnInfo::from).collect())
    }

    /// Returns every table with its columns, served from cache while fresh.
    ///
    /// A refresh that overlaps an [`invalidate`](Self::invalidate) is
    /// returned to its caller but not cached.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when a refresh fails.
    pub async fn snapshot(&self) -> SchemaResult<Arc<SchemaSnapshot>> {
        let now = self.clock.utc();
        if let Some(cached) = self.cache.read().await.as_ref()
            && age(now, cached.captured_at) < self.ttl
        {
            return Ok(Arc::clone(cached));
        }

        let generation = self.generation.load(Ordering::Acquire);
        let mut tables = Vec::new();
        for table in self.tables().await? {
            let columns = self.columns(&table).await?;
            tables.push(SchemaInfo { table, columns });
        }
        let snapshot = Arc::new(SchemaSnapshot {
            tables,
            captured_at: now,
        });
        let mut cache = self.cache.write().await;
        if self.generation.load(Ordering::Acquire) == generation {
            debug!(tables = snapshot.tables.len(), "schema snapshot refreshed");
            *cache = Some(Arc::clone(&snapshot));
        } else {
            debug!("schema changed during refresh; snapshot not cached");
        }
        Ok(snapshot)
    }

    /// Drops the cached snapshot so the next read refreshes it.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        *cache = None;
    }

    /// Loads table count and database size.
    ///
    /// A missing `get_database_size` procedure yields no size.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] when the snapshot or size lookup fails for
    /// another reason.
    pub async fn stats(&self) -> SchemaResult<DatabaseStats> {
        let table_count = self.snapshot().await?.tables.len();
        let database_size = match self.api.rpc("get_database_size", &json!({})).await {
            Ok(Value::String(size)) => Some(size),
            Ok(Value::Null) => None,
            Ok(other) => Some(other.to_string()),
            Err(err) if is_empty_state(&err) => None,
            Err(err) => return Err(err.into()),
        };
        Ok(DatabaseStats {
            table_count,
            database_size,
        })
    }
}

/// Snapshots stamped in the future count as brand new.
fn age(now: DateTime<Utc>, captured_at: DateTime<Utc>) -> Duration {
    now.signed_duration_since(captured_at)
        .to_std()
        .unwrap_or_default()
}

fn is_empty_state(error: &DataApiError) -> bool {
    error
        .remote_code()
        .is_some_and(|code| code.is_expected_empty_state())
}

fn empty_on_missing(answer: DataApiResult<Value>) -> SchemaResult<Option<Value>> {
    match answer {
        Ok(rows) => Ok(Some(rows)),
        Err(err) if is_empty_state(&err) => {
            debug!(error = %err, "information schema unavailable; treating database as empty");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn catalog_query(view: &str, columns: &str, filter: Filter) -> SchemaResult<SelectQuery> {
    let target = TableTarget::new(view)
        .and_then(|unscoped| unscoped.in_schema("information_schema"))
        .map_err(|err| SchemaError::Decode(err.to_string()))?;
    Ok(SelectQuery::new(target)
        .with_columns(columns)
        .with_filter(filter.eq("table_schema", INTROSPECTED_SCHEMA)))
}

fn decode_rows<T>(rows: Value) -> SchemaResult<Vec<T>>
where
    T: DeserializeOwned,
{
    match rows {
        Value::Null => Ok(Vec::new()),
        other => serde_json::from_value(other).map_err(|err| SchemaError::Decode(err.to_string())),
    }
}
