//! HTTP adapter for a project's REST data API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

use super::body::{decode_body, remote_error};
use crate::credentials::domain::{ApiKey, ConnectionConfig};
use crate::platform::{
    domain::{Filter, SelectQuery, TableTarget, validate_identifier},
    ports::{DataApi, DataApiConnector, DataApiError, DataApiResult},
};

/// Data API client bound to one project.
#[derive(Debug, Clone)]
pub struct HttpDataApi {
    client: Client,
    project_url: String,
    rest_url: String,
    api_key: ApiKey,
}

impl HttpDataApi {
    /// Creates a client for the project described by `config`.
    #[must_use]
    pub fn new(client: Client, config: &ConnectionConfig) -> Self {
        Self {
            client,
            project_url: config.project_url().as_str().to_owned(),
            rest_url: config.project_url().rest_url(),
            api_key: config.api_key().clone(),
        }
    }

    fn table_url(&self, target: &TableTarget) -> String {
        format!("{}/{}", self.rest_url, target.table())
    }

    fn with_profile(builder: RequestBuilder, header: &str, target: &TableTarget) -> RequestBuilder {
        match target.schema() {
            Some(schema) => builder.header(header, schema),
            None => builder,
        }
    }

    async fn execute(&self, operation: &str, builder: RequestBuilder) -> DataApiResult<Value> {
        let response = builder
            .header("apikey", self.api_key.expose())
            .bearer_auth(self.api_key.expose())
            .send()
            .await
            .map_err(DataApiError::transport)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(DataApiError::transport)?;
        if (200..300).contains(&status) {
            debug!(operation, status, "data API call succeeded");
            return Ok(decode_body(&text));
        }
        let error = remote_error(status, &text);
        debug!(operation, status, code = %error.code(), "data API call failed");
        Err(error.into())
    }
}

const fn prefer_header(returning: bool) -> &'static str {
    if returning {
        "return=representation"
    } else {
        "return=minimal"
    }
}

#[async_trait]
impl DataApi for HttpDataApi {
    async fn rpc(&self, function: &str, args: &Value) -> DataApiResult<Value> {
        let name = validate_identifier(function)
            .map_err(|err| DataApiError::InvalidRequest(err.to_string()))?;
        let url = format!("{}/rpc/{name}", self.rest_url);
        let body = if args.is_null() { json!({}) } else { args.clone() };
        self.execute("rpc", self.client.post(url).json(&body)).await
    }

    async fn select(&self, query: &SelectQuery) -> DataApiResult<Value> {
        let mut params = vec![("select".to_owned(), query.columns().to_owned())];
        params.extend(query.filter().to_query_pairs());
        if let Some(limit) = query.limit() {
            params.push(("limit".to_owned(), limit.to_string()));
        }
        let builder = self
            .client
            .get(self.table_url(query.target()))
            .query(&params);
        let profiled = Self::with_profile(builder, "Accept-Profile", query.target());
        self.execute("select", profiled).await
    }

    async fn insert(
        &self,
        target: &TableTarget,
        rows: &Value,
        returning: bool,
    ) -> DataApiResult<Value> {
        let builder = self
            .client
            .post(self.table_url(target))
            .header("Prefer", prefer_header(returning))
            .json(rows);
        let profiled = Self::with_profile(builder, "Content-Profile", target);
        self.execute("insert", profiled).await
    }

    async fn update(
        &self,
        target: &TableTarget,
        filter: &Filter,
        data: &Value,
        returning: bool,
    ) -> DataApiResult<Value> {
        let builder = self
            .client
            .patch(self.table_url(target))
            .query(&filter.to_query_pairs())
            .header("Prefer", prefer_header(returning))
            .json(data);
        let profiled = Self::with_profile(builder, "Content-Profile", target);
        self.execute("update", profiled).await
    }

    async fn delete(
        &self,
        target: &TableTarget,
        filter: &Filter,
        returning: bool,
    ) -> DataApiResult<Value> {
        let builder = self
            .client
            .delete(self.table_url(target))
            .query(&filter.to_query_pairs())
            .header("Prefer", prefer_header(returning));
        let profiled = Self::with_profile(builder, "Content-Profile", target);
        self.execute("delete", profiled).await
    }

    async fn sql(&self, query: &str) -> DataApiResult<Value> {
        let url = format!("{}/pg/query", self.project_url);
        let builder = self.client.post(url).json(&json!({ "query": query }));
        self.execute("sql", builder).await
    }
}

/// Connector creating one [`HttpDataApi`] per connection, sharing the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpDataApiConnector {
    client: Client,
}

impl HttpDataApiConnector {
    /// Creates a connector around a shared client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

impl DataApiConnector for HttpDataApiConnector {
    fn connect(&self, config: &ConnectionConfig) -> DataApiResult<Arc<dyn DataApi>> {
        Ok(Arc::new(HttpDataApi::new(self.client.clone(), config)))
    }
}
