//! DynamoDB as registry, capacity source, and capacity manager.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{
    BillingMode, BillingModeSummary, GlobalSecondaryIndexUpdate, ProvisionedThroughput,
    ProvisionedThroughputDescription, TableDescription, UpdateGlobalSecondaryIndexAction,
};
use parking_lot::Mutex;
use tracing::debug;

use dynoscale_core::service::{CapacityManager, CapacityMetadata, ResourceRegistry};
use dynoscale_core::{
    DynoscaleError, DynoscaleResult, IndexCapacity, ProvisionedCapacity, TableCapacity, Unit,
};

use crate::error::{build_error, sdk_error};

const SERVICE: &str = "dynamodb";

/// Holds the most recent table description until the index lookup for the
/// same table consumes it.
#[derive(Debug, Default)]
struct DescriptionCache(Mutex<Option<TableDescription>>);

impl DescriptionCache {
    fn store(&self, description: TableDescription) {
        *self.0.lock() = Some(description);
    }

    fn take(&self, table: &str) -> Option<TableDescription> {
        let mut slot = self.0.lock();
        if slot.as_ref().and_then(TableDescription::table_name) == Some(table) {
            slot.take()
        } else {
            None
        }
    }
}

/// DynamoDB control-plane client.
///
/// Each table is described once per pass: the description fetched for its
/// capacity is reused for its secondary indexes.
#[derive(Debug, Clone)]
pub struct DynamoDbTables {
    client: Client,
    last_described: Arc<DescriptionCache>,
}

impl DynamoDbTables {
    /// Wrap an SDK client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            last_described: Arc::default(),
        }
    }

    async fn describe(&self, table: &str) -> DynoscaleResult<TableDescription> {
        debug!(table, "describing table");
        let output = self
            .client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| sdk_error(SERVICE, "DescribeTable", e))?;
        output.table().cloned().ok_or_else(|| {
            DynoscaleError::malformed("DescribeTable", format!("no description for table {table}"))
        })
    }
}

#[async_trait]
impl ResourceRegistry for DynamoDbTables {
    async fn list_table_names(&self) -> DynoscaleResult<Vec<String>> {
        let mut names = Vec::new();
        let mut start: Option<String> = None;
        loop {
            let output = self
                .client
                .list_tables()
                .set_exclusive_start_table_name(start.take())
                .send()
                .await
                .map_err(|e| sdk_error(SERVICE, "ListTables", e))?;
            names.extend(output.table_names().iter().cloned());

            match output.last_evaluated_table_name() {
                Some(last) => start = Some(last.to_owned()),
                None => break,
            }
        }
        debug!(count = names.len(), "listed tables");
        Ok(names)
    }
}

#[async_trait]
impl CapacityMetadata for DynamoDbTables {
    async fn provisioned_capacity(&self, table: &str) -> DynoscaleResult<TableCapacity> {
        let description = self.describe(table).await?;
        let capacity = table_capacity(&description);
        self.last_described.store(description);
        Ok(capacity)
    }

    async fn secondary_indexes(&self, table: &str) -> DynoscaleResult<Vec<IndexCapacity>> {
        let description = match self.last_described.take(table) {
            Some(description) => description,
            None => self.describe(table).await?,
        };
        Ok(index_capacities(&description))
    }
}

#[async_trait]
impl CapacityManager for DynamoDbTables {
    async fn update_capacity(&self, unit: &Unit, read: i64, write: i64) -> DynoscaleResult<()> {
        let throughput = ProvisionedThroughput::builder()
            .read_capacity_units(read)
            .write_capacity_units(write)
            .build()
            .map_err(|e| build_error(SERVICE, "UpdateTable", e))?;

        let request = self.client.update_table().table_name(unit.table_name());
        let request = match unit.index_name() {
            None => request.provisioned_throughput(throughput),
            Some(index) => {
                let action = UpdateGlobalSecondaryIndexAction::builder()
                    .index_name(index)
                    .provisioned_throughput(throughput)
                    .build()
                    .map_err(|e| build_error(SERVICE, "UpdateTable", e))?;
                request.global_secondary_index_updates(
                    GlobalSecondaryIndexUpdate::builder().update(action).build(),
                )
            }
        };

        debug!(%unit, read, write, "updating provisioned throughput");
        request
            .send()
            .await
            .map_err(|e| sdk_error(SERVICE, "UpdateTable", e))?;
        Ok(())
    }
}

/// Capacity reported by a throughput description; absent means zero.
#[must_use]
pub fn capacity_from_description(
    description: Option<&ProvisionedThroughputDescription>,
) -> ProvisionedCapacity {
    description.map_or_else(ProvisionedCapacity::default, |d| ProvisionedCapacity {
        read: d.read_capacity_units().unwrap_or(0),
        write: d.write_capacity_units().unwrap_or(0),
        decreases_today: d.number_of_decreases_today().unwrap_or(0),
    })
}

/// Table-level capacity and billing mode.
#[must_use]
pub fn table_capacity(description: &TableDescription) -> TableCapacity {
    let on_demand = description
        .billing_mode_summary()
        .and_then(BillingModeSummary::billing_mode)
        .is_some_and(|mode| *mode == BillingMode::PayPerRequest);
    TableCapacity {
        capacity: capacity_from_description(description.provisioned_throughput()),
        on_demand,
    }
}

/// Capacity of every named global secondary index.
#[must_use]
pub fn index_capacities(description: &TableDescription) -> Vec<IndexCapacity> {
    description
        .global_secondary_indexes()
        .iter()
        .filter_map(|gsi| {
            Some(IndexCapacity {
                index_name: gsi.index_name()?.to_owned(),
                capacity: capacity_from_description(gsi.provisioned_throughput()),
            })
        })
        .collect()
}
