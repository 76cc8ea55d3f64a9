//! Per-unit evaluation record and its operator-facing rendering.

use std::fmt;

use crate::decision::{Decision, Peaks};
use crate::types::{ProvisionedCapacity, Unit};

/// Outcome of evaluating one unit, produced whether or not anything changed.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSummary {
    /// Table or index evaluated.
    pub unit: Unit,
    /// Read capacity before the run.
    pub read_capacity: i64,
    /// Write capacity before the run.
    pub write_capacity: i64,
    /// Decreases already applied today.
    pub decreases_today: i64,
    /// Configured daily decrease ceiling.
    pub max_decreases_per_day: i64,
    /// Peak consumed read units per second.
    pub peak_read: f64,
    /// Peak consumed write units per second.
    pub peak_write: f64,
    /// Whether read capacity changed.
    pub read_changed: bool,
    /// Read capacity after the run.
    pub new_read_capacity: i64,
    /// Whether write capacity changed.
    pub write_changed: bool,
    /// Write capacity after the run.
    pub new_write_capacity: i64,
}

impl UnitSummary {
    /// Assemble the record for an evaluated unit.
    #[must_use]
    pub fn new(
        unit: Unit,
        capacity: &ProvisionedCapacity,
        peaks: Peaks,
        decision: &Decision,
        max_decreases_per_day: i64,
    ) -> Self {
        Self {
            unit,
            read_capacity: capacity.read,
            write_capacity: capacity.write,
            decreases_today: capacity.decreases_today,
            max_decreases_per_day,
            peak_read: peaks.read,
            peak_write: peaks.write,
            read_changed: decision.read_changed,
            new_read_capacity: decision.read,
            write_changed: decision.write_changed,
            new_write_capacity: decision.write,
        }
    }

    /// Whether either direction changed.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.read_changed || self.write_changed
    }

    /// Subject line of the change notification.
    #[must_use]
    pub fn notification_subject(&self) -> String {
        match &self.unit {
            Unit::Table { table } => format!("Dynamo Capacity Updated For Table {table}"),
            Unit::Index { table, index } => {
                format!("Dynamo Capacity Updated For Index {index} on Table {table}")
            }
        }
    }

    /// HTML body of the change notification.
    #[must_use]
    pub fn notification_body(&self) -> String {
        format!("Details: {self}")
    }
}

impl fmt::Display for UnitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Unit::Table { table } => write!(f, "Dynamo Table: {table}")?,
            Unit::Index { table, index } => write!(f, "Dynamo Table ({table}) Index: {index}")?,
        }
        write!(
            f,
            " | Write Capacity: {} | Read Capacity: {} | Decreases So Far Today: {}/{}",
            self.write_capacity,
            self.read_capacity,
            self.decreases_today,
            self.max_decreases_per_day
        )?;
        write!(
            f,
            " | Peak Read Capacity (24hrs): {} | Peak Write Capacity (24hrs): {}",
            self.peak_read, self.peak_write
        )?;
        write!(
            f,
            " | Updated Read: {} | New Read Capacity: {} | Updated Write: {} | New Write Capacity: {}",
            self.read_changed, self.new_read_capacity, self.write_changed, self.new_write_capacity
        )
    }
}
