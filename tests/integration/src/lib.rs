//! Integration tests for Dynoscale against an AWS-compatible endpoint.
//!
//! These tests require a running emulator (RustStack, LocalStack) at
//! `localhost:4566`. They are marked `#[ignore]` so they don't run during
//! normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p dynoscale-integration -- --ignored
//! ```

use std::sync::{Arc, Once};

use async_trait::async_trait;
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection,
    ProjectionType, ProvisionedThroughput, ScalarAttributeType,
};

use dynoscale_aws::services_from_clients;
use dynoscale_core::service::ResourceRegistry;
use dynoscale_core::{DynoscaleResult, Services};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the emulator.
fn endpoint_url() -> String {
    std::env::var("DYNOSCALE_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:4566".to_owned())
}

fn credentials() -> Credentials {
    Credentials::new("test", "test", None, None, "integration-test")
}

/// Create a configured DynamoDB client pointing at the emulator.
#[must_use]
pub fn dynamodb_client() -> aws_sdk_dynamodb::Client {
    init_tracing();

    let config = aws_sdk_dynamodb::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials())
        .endpoint_url(endpoint_url())
        .build();

    aws_sdk_dynamodb::Client::from_conf(config)
}

/// Create a configured CloudWatch client pointing at the emulator.
#[must_use]
pub fn cloudwatch_client() -> aws_sdk_cloudwatch::Client {
    init_tracing();

    let config = aws_sdk_cloudwatch::config::Builder::new()
        .behavior_version(aws_sdk_cloudwatch::config::BehaviorVersion::latest())
        .region(aws_sdk_cloudwatch::config::Region::new("us-east-1"))
        .credentials_provider(credentials())
        .endpoint_url(endpoint_url())
        .build();

    aws_sdk_cloudwatch::Client::from_conf(config)
}

/// Create a configured SES client pointing at the emulator.
#[must_use]
pub fn ses_client() -> aws_sdk_ses::Client {
    init_tracing();

    let config = aws_sdk_ses::config::Builder::new()
        .behavior_version(aws_sdk_ses::config::BehaviorVersion::latest())
        .region(aws_sdk_ses::config::Region::new("us-east-1"))
        .credentials_provider(credentials())
        .endpoint_url(endpoint_url())
        .build();

    aws_sdk_ses::Client::from_conf(config)
}

/// Generate a unique table name for a test.
#[must_use]
pub fn test_table_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Registry restricted to the tables a test created, so concurrent tests
/// and leftovers on the emulator are never touched.
#[derive(Debug)]
pub struct OnlyTables(pub Vec<String>);

#[async_trait]
impl ResourceRegistry for OnlyTables {
    async fn list_table_names(&self) -> DynoscaleResult<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Real AWS adapters with the registry scoped to `tables`.
#[must_use]
pub fn scoped_services(tables: &[&str]) -> Services {
    let mut services = services_from_clients(dynamodb_client(), cloudwatch_client(), ses_client());
    services.registry = Arc::new(OnlyTables(
        tables.iter().map(|t| (*t).to_owned()).collect(),
    ));
    services
}

fn throughput(read: i64, write: i64) -> ProvisionedThroughput {
    ProvisionedThroughput::builder()
        .read_capacity_units(read)
        .write_capacity_units(write)
        .build()
        .unwrap()
}

fn key(name: &str) -> KeySchemaElement {
    KeySchemaElement::builder()
        .attribute_name(name)
        .key_type(KeyType::Hash)
        .build()
        .unwrap()
}

fn string_attribute(name: &str) -> AttributeDefinition {
    AttributeDefinition::builder()
        .attribute_name(name)
        .attribute_type(ScalarAttributeType::S)
        .build()
        .unwrap()
}

/// Create a provisioned table, optionally with one global secondary index
/// keyed on `gsk`. Caller is responsible for cleanup.
pub async fn create_provisioned_table(
    client: &aws_sdk_dynamodb::Client,
    table_name: &str,
    table_capacity: (i64, i64),
    index: Option<(&str, (i64, i64))>,
) {
    let mut request = client
        .create_table()
        .table_name(table_name)
        .key_schema(key("pk"))
        .attribute_definitions(string_attribute("pk"))
        .billing_mode(BillingMode::Provisioned)
        .provisioned_throughput(throughput(table_capacity.0, table_capacity.1));

    if let Some((index_name, (read, write))) = index {
        request = request
            .attribute_definitions(string_attribute("gsk"))
            .global_secondary_indexes(
                GlobalSecondaryIndex::builder()
                    .index_name(index_name)
                    .key_schema(key("gsk"))
                    .projection(
                        Projection::builder()
                            .projection_type(ProjectionType::All)
                            .build(),
                    )
                    .provisioned_throughput(throughput(read, write))
                    .build()
                    .unwrap(),
            );
    }

    request
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to create table {table_name}: {e}"));
}

/// Delete a table, ignoring errors.
pub async fn cleanup_table(client: &aws_sdk_dynamodb::Client, table_name: &str) {
    let _ = client.delete_table().table_name(table_name).send().await;
}

mod test_adapters;
mod test_adjuster;
