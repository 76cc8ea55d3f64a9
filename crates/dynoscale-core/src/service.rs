//! Narrow interfaces to the external services the adjuster depends on.
//!
//! Each trait covers exactly the capability the adjuster needs, so a run can
//! be driven by the AWS adapters in production and by in-memory doubles in
//! tests.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::DynoscaleResult;
use crate::types::{Direction, IndexCapacity, MetricSample, MetricWindow, TableCapacity, Unit};

/// Enumerates the tables a run evaluates.
#[async_trait]
pub trait ResourceRegistry: Send + Sync {
    /// All table names, in listing order.
    async fn list_table_names(&self) -> DynoscaleResult<Vec<String>>;
}

/// Reports current provisioned throughput.
#[async_trait]
pub trait CapacityMetadata: Send + Sync {
    /// Provisioned throughput of a table.
    async fn provisioned_capacity(&self, table: &str) -> DynoscaleResult<TableCapacity>;

    /// Provisioned throughput of every secondary index of a table.
    ///
    /// Empty when the table has none.
    async fn secondary_indexes(&self, table: &str) -> DynoscaleResult<Vec<IndexCapacity>>;
}

/// Supplies consumed-capacity samples.
#[async_trait]
pub trait ConsumptionMetrics: Send + Sync {
    /// Summed consumption per bucket over the window.
    async fn consumed_capacity(
        &self,
        unit: &Unit,
        direction: Direction,
        window: &MetricWindow,
    ) -> DynoscaleResult<Vec<MetricSample>>;
}

/// Applies new provisioned throughput.
#[async_trait]
pub trait CapacityManager: Send + Sync {
    /// Set read and write capacity of a unit in a single update.
    async fn update_capacity(&self, unit: &Unit, read: i64, write: i64) -> DynoscaleResult<()>;
}

/// Delivers change notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one message with an HTML body.
    async fn send_notification(
        &self,
        sender: &str,
        recipients: &[String],
        subject: &str,
        html_body: &str,
    ) -> DynoscaleResult<()>;
}

/// The full set of collaborators, constructed once per process.
#[derive(Clone)]
pub struct Services {
    /// Table listing.
    pub registry: Arc<dyn ResourceRegistry>,
    /// Capacity lookups.
    pub metadata: Arc<dyn CapacityMetadata>,
    /// Consumption samples.
    pub metrics: Arc<dyn ConsumptionMetrics>,
    /// Capacity updates.
    pub manager: Arc<dyn CapacityManager>,
    /// Notifications.
    pub notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
