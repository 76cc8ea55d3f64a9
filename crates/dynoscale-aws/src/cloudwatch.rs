//! CloudWatch as the source of consumed-capacity samples.

use async_trait::async_trait;
use aws_sdk_cloudwatch::Client;
use aws_sdk_cloudwatch::primitives::DateTime as SmithyDateTime;
use aws_sdk_cloudwatch::types::{Datapoint, Dimension, Statistic};
use chrono::{DateTime, Utc};
use tracing::debug;

use dynoscale_core::service::ConsumptionMetrics;
use dynoscale_core::{Direction, DynoscaleError, DynoscaleResult, MetricSample, MetricWindow, Unit};

use crate::error::sdk_error;

const SERVICE: &str = "cloudwatch";

/// Namespace DynamoDB publishes its metrics under.
pub const NAMESPACE: &str = "AWS/DynamoDB";

/// CloudWatch metrics reader.
#[derive(Debug, Clone)]
pub struct CloudWatchMetrics {
    client: Client,
}

impl CloudWatchMetrics {
    /// Wrap an SDK client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConsumptionMetrics for CloudWatchMetrics {
    async fn consumed_capacity(
        &self,
        unit: &Unit,
        direction: Direction,
        window: &MetricWindow,
    ) -> DynoscaleResult<Vec<MetricSample>> {
        let period = i32::try_from(window.bucket_seconds).map_err(|_| {
            DynoscaleError::Config(format!(
                "bucket seconds out of range: {}",
                window.bucket_seconds
            ))
        })?;
        let output = self
            .client
            .get_metric_statistics()
            .namespace(NAMESPACE)
            .metric_name(direction.consumed_metric_name())
            .set_dimensions(Some(dimensions(unit)))
            .start_time(to_smithy(window.start))
            .end_time(to_smithy(window.end))
            .period(period)
            .statistics(Statistic::Sum)
            .send()
            .await
            .map_err(|e| sdk_error(SERVICE, "GetMetricStatistics", e))?;

        let samples = samples_from_datapoints(output.datapoints());
        debug!(%unit, %direction, samples = samples.len(), "fetched consumed capacity");
        Ok(samples)
    }
}

/// Metric dimensions addressing a table or one of its indexes.
#[must_use]
pub fn dimensions(unit: &Unit) -> Vec<Dimension> {
    let mut dimensions = vec![
        Dimension::builder()
            .name("TableName")
            .value(unit.table_name())
            .build(),
    ];
    if let Some(index) = unit.index_name() {
        dimensions.push(
            Dimension::builder()
                .name("GlobalSecondaryIndexName")
                .value(index)
                .build(),
        );
    }
    dimensions
}

/// Datapoints carrying a `Sum`, ordered by timestamp.
#[must_use]
pub fn samples_from_datapoints(datapoints: &[Datapoint]) -> Vec<MetricSample> {
    let mut samples: Vec<MetricSample> = datapoints
        .iter()
        .filter_map(|dp| {
            let sum = dp.sum()?;
            let timestamp = dp
                .timestamp()
                .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
                .unwrap_or_default();
            Some(MetricSample { timestamp, sum })
        })
        .collect();
    samples.sort_by_key(|s| s.timestamp);
    samples
}

fn to_smithy(time: DateTime<Utc>) -> SmithyDateTime {
    SmithyDateTime::from_secs(time.timestamp())
}
