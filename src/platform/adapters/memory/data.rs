//! Scripted data API and connector.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::credentials::domain::ConnectionConfig;
use crate::platform::{
    domain::{Filter, RemoteError, RemoteErrorCode, SelectQuery, TableTarget},
    ports::{DataApi, DataApiConnector, DataApiError, DataApiResult},
};

/// A call observed by [`ScriptedDataApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum DataCall {
    /// `rpc(function, args)`.
    Rpc {
        /// Procedure name.
        function: String,
        /// Arguments passed.
        args: Value,
    },
    /// `select` against a table.
    Select(String),
    /// `insert` into a table.
    Insert {
        /// Target table.
        table: String,
        /// Rows passed.
        rows: Value,
    },
    /// `update` of a table.
    Update(String),
    /// `delete` from a table.
    Delete(String),
    /// Raw SQL sent to the generic endpoint.
    Sql(String),
}

/// Data API answering from per-function and per-table scripts.
///
/// Unscripted procedures answer "undefined function" and unscripted tables
/// answer "undefined table", mirroring an empty database.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDataApi {
    state: Arc<RwLock<DataState>>,
}

#[derive(Debug, Default)]
struct DataState {
    rpc: HashMap<String, DataApiResult<Value>>,
    tables: HashMap<String, DataApiResult<Value>>,
    sql: Option<DataApiResult<Value>>,
    mutation_error: Option<DataApiError>,
    calls: Vec<DataCall>,
}

impl ScriptedDataApi {
    /// Creates a script describing an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn update(&self, change: impl FnOnce(&mut DataState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        change(&mut state);
    }

    fn record<T>(&self, call: DataCall, answer: impl FnOnce(&DataState) -> T) -> T {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.calls.push(call);
        answer(&state)
    }

    /// Scripts the result of calling `function`.
    #[must_use]
    pub fn with_rpc(self, function: &str, result: DataApiResult<Value>) -> Self {
        self.update(|state| {
            state.rpc.insert(function.to_owned(), result);
        });
        self
    }

    /// Scripts the rows returned when selecting from `table`.
    #[must_use]
    pub fn with_table(self, table: &str, result: DataApiResult<Value>) -> Self {
        self.update(|state| {
            state.tables.insert(table.to_owned(), result);
        });
        self
    }

    /// Scripts the generic SQL endpoint.
    #[must_use]
    pub fn with_sql(self, result: DataApiResult<Value>) -> Self {
        self.update(|state| state.sql = Some(result));
        self
    }

    /// Makes every insert, update, and delete fail with `error`.
    #[must_use]
    pub fn with_mutation_error(self, error: DataApiError) -> Self {
        self.update(|state| state.mutation_error = Some(error));
        self
    }

    /// Calls observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<DataCall> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .calls
            .clone()
    }
}

/// Builds the error an empty database answers for `function`.
#[must_use]
pub fn undefined_function(function: &str) -> DataApiError {
    RemoteError::with_code(
        Some(404),
        RemoteErrorCode::UndefinedFunction,
        format!("Could not find the function public.{function} in the schema cache"),
    )
    .into()
}

/// Builds the error an empty database answers for `table`.
#[must_use]
pub fn undefined_table(table: &str) -> DataApiError {
    RemoteError::with_code(
        Some(404),
        RemoteErrorCode::UndefinedTable,
        format!("relation \"public.{table}\" does not exist"),
    )
    .into()
}

fn mutation_result(state: &DataState, value: Value, returning: bool) -> DataApiResult<Value> {
    match &state.mutation_error {
        Some(error) => Err(error.clone()),
        None if returning => Ok(value),
        None => Ok(Value::Null),
    }
}

#[async_trait]
impl DataApi for ScriptedDataApi {
    async fn rpc(&self, function: &str, args: &Value) -> DataApiResult<Value> {
        let call = DataCall::Rpc {
            function: function.to_owned(),
            args: args.clone(),
        };
        self.record(call, |state| {
            state
                .rpc
                .get(function)
                .cloned()
                .unwrap_or_else(|| Err(undefined_function(function)))
        })
    }

    async fn select(&self, query: &SelectQuery) -> DataApiResult<Value> {
        let table = query.target().table();
        self.record(DataCall::Select(table.to_owned()), |state| {
            state
                .tables
                .get(table)
                .cloned()
                .unwrap_or_else(|| Err(undefined_table(table)))
        })
    }

    async fn insert(
        &self,
        target: &TableTarget,
        rows: &Value,
        returning: bool,
    ) -> DataApiResult<Value> {
        let call = DataCall::Insert {
            table: target.table().to_owned(),
            rows: rows.clone(),
        };
        let echoed = if rows.is_array() {
            rows.clone()
        } else {
            json!([rows])
        };
        self.record(call, |state| mutation_result(state, echoed, returning))
    }

    async fn update(
        &self,
        target: &TableTarget,
        _filter: &Filter,
        data: &Value,
        returning: bool,
    ) -> DataApiResult<Value> {
        let call = DataCall::Update(target.table().to_owned());
        self.record(call, |state| mutation_result(state, json!([data]), returning))
    }

    async fn delete(
        &self,
        target: &TableTarget,
        _filter: &Filter,
        returning: bool,
    ) -> DataApiResult<Value> {
        let call = DataCall::Delete(target.table().to_owned());
        self.record(call, |state| mutation_result(state, json!([]), returning))
    }

    async fn sql(&self, query: &str) -> DataApiResult<Value> {
        self.record(DataCall::Sql(query.to_owned()), |state| {
            state.sql.clone().unwrap_or_else(|| {
                Err(RemoteError::new(Some(404), None, "SQL endpoint not available").into())
            })
        })
    }
}

/// Connector handing out one shared [`ScriptedDataApi`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedConnector {
    api: ScriptedDataApi,
    connected: Arc<RwLock<Vec<ConnectionConfig>>>,
}

impl ScriptedConnector {
    /// Creates a connector returning `api` for every connection.
    #[must_use]
    pub fn new(api: ScriptedDataApi) -> Self {
        Self {
            api,
            connected: Arc::default(),
        }
    }

    /// The scripted API handed out.
    #[must_use]
    pub const fn api(&self) -> &ScriptedDataApi {
        &self.api
    }

    /// Connections requested so far.
    #[must_use]
    pub fn connections(&self) -> Vec<ConnectionConfig> {
        self.connected
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DataApiConnector for ScriptedConnector {
    fn connect(&self, config: &ConnectionConfig) -> DataApiResult<Arc<dyn DataApi>> {
        self.connected
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(config.clone());
        Ok(Arc::new(self.api.clone()))
    }
}
