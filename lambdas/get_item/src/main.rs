use crate::http_handler::{function_handler, HandlerDeps};
use lambda_http::{run, service_fn, tracing, Error};
use shared::adapters::DynamoDbTableClient;
use shared::configuration::Configuration;

mod http_handler;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();
    let configuration = Configuration::load()?;
    tracing::info!("{}", configuration);

    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let dynamodb_client = aws_sdk_dynamodb::Client::new(&config);
    let deps = HandlerDeps {
        client: DynamoDbTableClient::new(dynamodb_client),
        configuration,
    };

    run(service_fn(|event| function_handler(&deps, event))).await
}
