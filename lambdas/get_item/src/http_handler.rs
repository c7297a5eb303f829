use lambda_http::RequestExt;
use lambda_http::{http::StatusCode, Error, IntoResponse, Request};
use serde_json::json;
use shared::configuration::Configuration;
use shared::core::{fetch_item, KeyCondition, QueryRequest, TableClient};
use shared::error::TableError;
use shared::utils::{empty_response, json_response};
use shared::CancellationToken;

pub(crate) struct HandlerDeps<C: TableClient> {
    pub client: C,
    pub configuration: Configuration,
}

#[tracing::instrument(skip(deps, event))]
pub(crate) async fn function_handler<C: TableClient>(
    deps: &HandlerDeps<C>,
    event: Request,
) -> Result<impl IntoResponse, Error> {
    tracing::info!("Received event: {:?}", event);

    let id = event
        .path_parameters_ref()
        .and_then(|params| params.first("id"))
        .unwrap_or("");

    if id.is_empty() {
        return empty_response(&StatusCode::NOT_FOUND);
    }

    let request = QueryRequest::new(
        &deps.configuration.table_name,
        KeyCondition::new(&deps.configuration.key_attribute, id),
    )
    .with_consistent_read(deps.configuration.consistent_read);

    match fetch_item(&deps.client, request, &CancellationToken::new()).await {
        Ok(response) if !response.is_success() => {
            tracing::warn!(
                "Table service answered with status {}",
                response.status_code
            );
            empty_response(&StatusCode::BAD_GATEWAY)
        }
        Ok(response) if response.items.is_empty() => empty_response(&StatusCode::NOT_FOUND),
        Ok(response) => json_response(&StatusCode::OK, &json!({ "items": response.items })),
        Err(TableError::InvalidRequest(reason)) => {
            tracing::warn!("Rejected request: {}", reason);
            empty_response(&StatusCode::BAD_REQUEST)
        }
        Err(e) => {
            tracing::error!("Failed to get item: {:?}", e);
            empty_response(&StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
