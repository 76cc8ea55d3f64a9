//! AWS SDK client setup.

use std::sync::Arc;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::info;

use dynoscale_core::{DynoscaleConfig, Services};

use crate::cloudwatch::CloudWatchMetrics;
use crate::dynamodb::DynamoDbTables;
use crate::ses::SesNotifier;

/// Load the shared SDK configuration, applying region and endpoint overrides.
pub async fn load_sdk_config(config: &DynoscaleConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.as_str().to_owned()));
    }
    if let Some(endpoint) = &config.endpoint_url {
        info!(endpoint = %endpoint, "using custom AWS endpoint");
        loader = loader.endpoint_url(endpoint);
    }

    loader.load().await
}

/// Build every collaborator from one shared SDK configuration.
#[must_use]
pub fn aws_services(sdk_config: &SdkConfig) -> Services {
    services_from_clients(
        aws_sdk_dynamodb::Client::new(sdk_config),
        aws_sdk_cloudwatch::Client::new(sdk_config),
        aws_sdk_ses::Client::new(sdk_config),
    )
}

/// Build every collaborator from individually configured clients.
#[must_use]
pub fn services_from_clients(
    dynamodb: aws_sdk_dynamodb::Client,
    cloudwatch: aws_sdk_cloudwatch::Client,
    ses: aws_sdk_ses::Client,
) -> Services {
    let tables = Arc::new(DynamoDbTables::new(dynamodb));
    Services {
        registry: tables.clone(),
        metadata: tables.clone(),
        metrics: Arc::new(CloudWatchMetrics::new(cloudwatch)),
        manager: tables,
        notifier: Arc::new(SesNotifier::new(ses)),
    }
}
