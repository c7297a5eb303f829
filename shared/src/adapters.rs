use crate::{
    core::{Item, QueryRequest, QueryResponse, TableClient},
    error::TableError,
};
use async_trait::async_trait;
use aws_sdk_dynamodb::{
    error::DisplayErrorContext, operation::query::builders::QueryFluentBuilder,
    types::AttributeValue, Client,
};
use lambda_http::http::StatusCode;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

const KEY_NAME_PLACEHOLDER: &str = "#k";
const KEY_VALUE_PLACEHOLDER: &str = ":v_Id";

#[derive(Debug)]
pub struct DynamoDbTableClient {
    dynamodb_client: Client,
}

impl DynamoDbTableClient {
    pub fn new(dynamodb_client: Client) -> Self {
        Self { dynamodb_client }
    }

    fn build_query(&self, request: &QueryRequest) -> QueryFluentBuilder {
        self.dynamodb_client
            .query()
            .table_name(&request.table_name)
            .key_condition_expression(format!(
                "{} = {}",
                KEY_NAME_PLACEHOLDER, KEY_VALUE_PLACEHOLDER
            ))
            .expression_attribute_names(KEY_NAME_PLACEHOLDER, &request.key.attribute_name)
            .expression_attribute_values(
                KEY_VALUE_PLACEHOLDER,
                AttributeValue::S(request.key.value.clone()),
            )
            .consistent_read(request.consistent_read)
    }
}

#[async_trait]
impl TableClient for DynamoDbTableClient {
    async fn query(
        &self,
        request: QueryRequest,
        cancel: &CancellationToken,
    ) -> Result<QueryResponse, TableError> {
        let query = self.build_query(&request);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TableError::Cancelled),
            result = query.send() => result,
        };

        match result {
            Ok(output) => {
                let items = output
                    .items
                    .unwrap_or_default()
                    .iter()
                    .map(item_to_json)
                    .collect();
                Ok(QueryResponse::with_items(StatusCode::OK, items))
            }
            Err(e) => {
                let status = e.raw_response().map(|raw| raw.status().as_u16());
                Err(TableError::service(
                    status,
                    format!(
                        "Error querying table '{}': {}",
                        request.table_name,
                        DisplayErrorContext(&e)
                    ),
                ))
            }
        }
    }
}

pub fn item_to_json(item: &HashMap<String, AttributeValue>) -> Item {
    item.iter()
        .map(|(name, value)| (name.clone(), attribute_to_json(value)))
        .collect()
}

fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => number_to_json(n),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(list) => Value::Array(list.iter().map(attribute_to_json).collect()),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(name, value)| (name.clone(), attribute_to_json(value)))
                .collect::<Map<String, Value>>(),
        ),
        AttributeValue::Ss(set) => Value::Array(set.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(set) => Value::Array(set.iter().map(|n| number_to_json(n)).collect()),
        AttributeValue::B(blob) => bytes_to_json(blob.as_ref()),
        AttributeValue::Bs(blobs) => {
            Value::Array(blobs.iter().map(|blob| bytes_to_json(blob.as_ref())).collect())
        }
        _ => Value::Null,
    }
}

// DynamoDB numbers travel as strings with up to 38 significant digits; anything
// an i64, u64 or f64 cannot hold exactly stays a string.
fn number_to_json(n: &str) -> Value {
    if let Ok(int) = n.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Ok(int) = n.parse::<u64>() {
        return Value::Number(int.into());
    }
    n.parse::<f64>()
        .ok()
        .filter(|float| float.to_string() == n)
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(n.to_string()))
}

fn bytes_to_json(bytes: &[u8]) -> Value {
    Value::Array(bytes.iter().map(|b| Value::Number((*b).into())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::KeyCondition;
    use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
    use aws_sdk_dynamodb::primitives::Blob;
    use serde_json::json;

    fn offline_client() -> DynamoDbTableClient {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("akid", "secret", None, None, "test"))
            .endpoint_url("http://127.0.0.1:1")
            .build();
        DynamoDbTableClient::new(Client::from_conf(config))
    }

    #[test]
    fn query_targets_table_and_partition_key() {
        let client = offline_client();
        let request =
            QueryRequest::new("testtable", KeyCondition::new("ID", "25")).with_consistent_read(true);

        let query = client.build_query(&request);

        assert_eq!(query.get_table_name().as_deref(), Some("testtable"));
        assert_eq!(
            query.get_key_condition_expression().as_deref(),
            Some("#k = :v_Id")
        );
        assert_eq!(
            query
                .get_expression_attribute_names()
                .as_ref()
                .and_then(|names| names.get("#k"))
                .map(String::as_str),
            Some("ID")
        );
        assert_eq!(
            query
                .get_expression_attribute_values()
                .as_ref()
                .and_then(|values| values.get(":v_Id")),
            Some(&AttributeValue::S("25".to_string()))
        );
        assert_eq!(query.get_consistent_read(), &Some(true));
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits_the_query() {
        let client = offline_client();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = client
            .query(
                QueryRequest::new("testtable", KeyCondition::new("ID", "25")),
                &cancel,
            )
            .await;

        assert_eq!(result, Err(TableError::Cancelled));
    }

    #[test]
    fn item_attributes_are_rendered_as_json() {
        let mut nested = HashMap::new();
        nested.insert("Score".to_string(), AttributeValue::N("4.5".to_string()));

        let mut item = HashMap::new();
        item.insert("ID".to_string(), AttributeValue::S("25".to_string()));
        item.insert("Clicks".to_string(), AttributeValue::N("7".to_string()));
        item.insert("Active".to_string(), AttributeValue::Bool(true));
        item.insert("Deleted".to_string(), AttributeValue::Null(true));
        item.insert(
            "Tags".to_string(),
            AttributeValue::Ss(vec!["a".to_string(), "b".to_string()]),
        );
        item.insert(
            "History".to_string(),
            AttributeValue::L(vec![
                AttributeValue::N("1".to_string()),
                AttributeValue::S("x".to_string()),
            ]),
        );
        item.insert("Details".to_string(), AttributeValue::M(nested));
        item.insert("Raw".to_string(), AttributeValue::B(Blob::new(vec![1u8, 2])));

        let json = Value::Object(item_to_json(&item));

        assert_eq!(
            json,
            json!({
                "ID": "25",
                "Clicks": 7,
                "Active": true,
                "Deleted": null,
                "Tags": ["a", "b"],
                "History": [1, "x"],
                "Details": {"Score": 4.5},
                "Raw": [1, 2]
            })
        );
    }

    #[test]
    fn oversized_numbers_stay_strings() {
        let huge = "1".repeat(400);

        assert_eq!(number_to_json(&huge), Value::String(huge.clone()));
        assert_eq!(number_to_json("-12"), json!(-12));
    }

    #[test]
    fn numbers_that_would_lose_precision_stay_strings() {
        assert_eq!(
            number_to_json("12345678901234567890"),
            json!(12345678901234567890u64)
        );
        assert_eq!(
            number_to_json("0.12345678901234567890123"),
            json!("0.12345678901234567890123")
        );
        assert_eq!(
            number_to_json("12345678901234567890123456789012345678"),
            json!("12345678901234567890123456789012345678")
        );
        assert_eq!(number_to_json("4.5"), json!(4.5));
    }
}
