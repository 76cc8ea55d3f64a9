//! Capacity adjuster: one pass over every table and index.
//!
//! Tables are processed strictly in listing order, each table before its
//! indexes, one external call at a time. The first collaborator error aborts
//! the run; tables not yet reached are left for the next invocation.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::DynoscaleConfig;
use crate::decision::{self, Peaks, ScalingPolicy};
use crate::error::DynoscaleResult;
use crate::service::Services;
use crate::summary::UnitSummary;
use crate::types::{Direction, MetricWindow, ProvisionedCapacity, Unit};

/// Evaluates and adjusts provisioned capacity.
#[derive(Debug)]
pub struct CapacityAdjuster {
    config: DynoscaleConfig,
    policy: ScalingPolicy,
    services: Services,
}

impl CapacityAdjuster {
    /// Create an adjuster over the given collaborators.
    #[must_use]
    pub fn new(config: DynoscaleConfig, services: Services) -> Self {
        let policy = config.policy();
        Self {
            config,
            policy,
            services,
        }
    }

    /// Run one invocation with the window ending now.
    pub async fn run(&self) -> DynoscaleResult<Vec<UnitSummary>> {
        self.run_at(Utc::now()).await
    }

    /// Run one invocation with the window ending at `now`.
    ///
    /// Returns a summary for every evaluated unit, in processing order.
    pub async fn run_at(&self, now: DateTime<Utc>) -> DynoscaleResult<Vec<UnitSummary>> {
        let window = MetricWindow::trailing(now, self.config.bucket_seconds);
        let tables = self.services.registry.list_table_names().await?;
        info!(
            tables = tables.len(),
            dry_run = self.config.dry_run,
            "evaluating provisioned capacity"
        );

        let mut report = Vec::new();
        for table in &tables {
            self.adjust_table(table, &window, &mut report).await?;
        }
        Ok(report)
    }

    async fn adjust_table(
        &self,
        table: &str,
        window: &MetricWindow,
        report: &mut Vec<UnitSummary>,
    ) -> DynoscaleResult<()> {
        let current = self.services.metadata.provisioned_capacity(table).await?;
        if !current.is_adjustable() {
            warn!(
                table,
                on_demand = current.on_demand,
                "skipping table without provisioned capacity"
            );
            return Ok(());
        }

        let summary = self
            .adjust_unit(Unit::table(table), &current.capacity, window)
            .await?;
        report.push(summary);

        let indexes = self.services.metadata.secondary_indexes(table).await?;
        if indexes.is_empty() {
            info!("No secondary indexes in table: {table}");
            return Ok(());
        }

        for index in &indexes {
            if !index.capacity.is_provisioned() {
                warn!(
                    table,
                    index = %index.index_name,
                    "skipping index without provisioned capacity"
                );
                continue;
            }
            let summary = self
                .adjust_unit(Unit::index(table, &index.index_name), &index.capacity, window)
                .await?;
            report.push(summary);
        }
        info!("Finished Secondary Indexes on Table: {table}");
        Ok(())
    }

    async fn adjust_unit(
        &self,
        unit: Unit,
        capacity: &ProvisionedCapacity,
        window: &MetricWindow,
    ) -> DynoscaleResult<UnitSummary> {
        let peaks = Peaks {
            read: self.peak(&unit, Direction::Read, window).await?,
            write: self.peak(&unit, Direction::Write, window).await?,
        };
        let decision = decision::evaluate(capacity, peaks, &self.policy);

        if decision.is_changed() && !self.config.dry_run {
            self.services
                .manager
                .update_capacity(&unit, decision.read, decision.write)
                .await?;
        }

        let summary = UnitSummary::new(
            unit,
            capacity,
            peaks,
            &decision,
            self.policy.max_decreases_per_day,
        );

        if summary.is_changed() && self.config.notifications_enabled() && !self.config.dry_run {
            self.services
                .notifier
                .send_notification(
                    &self.config.sender,
                    &self.config.recipients,
                    &summary.notification_subject(),
                    &summary.notification_body(),
                )
                .await?;
        }

        info!(
            unit = %summary.unit,
            changed = summary.is_changed(),
            new_read = summary.new_read_capacity,
            new_write = summary.new_write_capacity,
            dry_run = self.config.dry_run,
            "{summary}"
        );
        Ok(summary)
    }

    async fn peak(
        &self,
        unit: &Unit,
        direction: Direction,
        window: &MetricWindow,
    ) -> DynoscaleResult<f64> {
        let samples = self
            .services
            .metrics
            .consumed_capacity(unit, direction, window)
            .await?;
        let peak = decision::peak_per_second(&samples, window.bucket_seconds);
        debug!(%unit, %direction, samples = samples.len(), peak, "computed peak consumption");
        Ok(peak)
    }
}
