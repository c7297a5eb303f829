use crate::error::TableError;
use async_trait::async_trait;
use lambda_http::http::StatusCode;
use serde_json::{Map, Value};
use std::fmt::Debug;
use tokio_util::sync::CancellationToken;

#[cfg(any(test, feature = "mocks"))]
use mockall::automock;

/// Partition key attribute the item tables are keyed on unless configured otherwise.
pub const DEFAULT_KEY_ATTRIBUTE: &str = "ID";

/// A single item, attribute name to JSON-rendered value.
pub type Item = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCondition {
    pub attribute_name: String,
    pub value: String,
}

impl KeyCondition {
    pub fn new(attribute_name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute_name: attribute_name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub table_name: String,
    pub key: KeyCondition,
    pub consistent_read: bool,
}

impl QueryRequest {
    pub fn new(table_name: impl Into<String>, key: KeyCondition) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            consistent_read: false,
        }
    }

    pub fn with_consistent_read(mut self, consistent_read: bool) -> Self {
        self.consistent_read = consistent_read;
        self
    }

    fn validate(&self) -> Result<(), TableError> {
        if self.table_name.is_empty() {
            return Err(TableError::InvalidRequest(
                "table name must not be empty".to_string(),
            ));
        }
        if self.key.attribute_name.is_empty() {
            return Err(TableError::InvalidRequest(
                "key attribute name must not be empty".to_string(),
            ));
        }
        if self.key.value.is_empty() {
            return Err(TableError::InvalidRequest(
                "item id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub status_code: StatusCode,
    pub items: Vec<Item>,
}

impl QueryResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            items: vec![],
        }
    }

    pub fn with_items(status_code: StatusCode, items: Vec<Item>) -> Self {
        Self { status_code, items }
    }

    pub fn is_success(&self) -> bool {
        self.status_code.is_success()
    }

    pub fn first_item(&self) -> Option<&Item> {
        self.items.first()
    }
}

/// Query capability of a managed key-value table.
///
/// Implementations must complete with either a response or an error; the
/// cancellation token lets a caller abandon an in-flight query.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait TableClient: Debug {
    async fn query(
        &self,
        request: QueryRequest,
        cancel: &CancellationToken,
    ) -> Result<QueryResponse, TableError>;
}

/// Fetches the item whose `ID` attribute equals `id` from `table_name`.
pub async fn get_item<C: TableClient + ?Sized>(
    client: &C,
    table_name: &str,
    id: &str,
) -> Result<QueryResponse, TableError> {
    let request = QueryRequest::new(table_name, KeyCondition::new(DEFAULT_KEY_ATTRIBUTE, id));
    fetch_item(client, request, &CancellationToken::new()).await
}

/// Sends one query and hands back whatever the client answered, status included.
#[tracing::instrument(skip(client, cancel))]
pub async fn fetch_item<C: TableClient + ?Sized>(
    client: &C,
    request: QueryRequest,
    cancel: &CancellationToken,
) -> Result<QueryResponse, TableError> {
    request.validate()?;

    let response = client.query(request, cancel).await.map_err(|e| {
        tracing::error!("Query failed: {}", e);
        e
    })?;

    tracing::info!(
        status = response.status_code.as_u16(),
        items = response.items.len(),
        "Query completed"
    );
    Ok(response)
}
