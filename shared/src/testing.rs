//! Test doubles for code that talks to a [`TableClient`](crate::core::TableClient).

use crate::core::{MockTableClient, QueryResponse};
use crate::error::TableError;
use lambda_http::http::StatusCode;

/// Builds a mock client expecting one query.
///
/// When `expected_table_name` is non-empty the mock panics if the query
/// targets any other table. It always answers with `status_code` and no items.
pub fn create_mock_table_client(
    expected_table_name: &str,
    status_code: StatusCode,
) -> MockTableClient {
    let expected_table_name = expected_table_name.to_string();
    let mut client = MockTableClient::new();
    client
        .expect_query()
        .times(1)
        .returning(move |request, _cancel| {
            if !expected_table_name.is_empty() {
                assert!(
                    expected_table_name == request.table_name,
                    "The provided table name is not the one used to access the table"
                );
            }
            Ok(QueryResponse::new(status_code))
        });
    client
}

/// Asserts that the fetch produced a response and that it reports 200.
pub fn assert_got_item<'a>(
    result: &'a Result<QueryResponse, TableError>,
    table_name: &str,
    id: &str,
) -> &'a QueryResponse {
    let response = match result {
        Ok(response) => response,
        Err(e) => panic!("Could NOT get result from querying table {table_name}: {e}"),
    };
    assert!(
        response.status_code == StatusCode::OK,
        "Could NOT get item # {id} from table {table_name}"
    );
    response
}

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
