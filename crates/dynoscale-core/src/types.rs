//! Unit, capacity, and metric types shared by the adjuster and its collaborators.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// Length of the trailing consumption window, in minutes.
pub const LOOKBACK_MINUTES: i64 = 1440;

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A table or one of its secondary indexes: the granularity of a decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Unit {
    /// A top-level table.
    Table {
        /// Table name.
        table: String,
    },
    /// A global secondary index attached to a table.
    Index {
        /// Owning table name.
        table: String,
        /// Index name.
        index: String,
    },
}

impl Unit {
    /// A table unit.
    #[must_use]
    pub fn table(table: impl Into<String>) -> Self {
        Self::Table {
            table: table.into(),
        }
    }

    /// An index unit.
    #[must_use]
    pub fn index(table: impl Into<String>, index: impl Into<String>) -> Self {
        Self::Index {
            table: table.into(),
            index: index.into(),
        }
    }

    /// Name of the table this unit belongs to.
    #[must_use]
    pub fn table_name(&self) -> &str {
        match self {
            Self::Table { table } | Self::Index { table, .. } => table,
        }
    }

    /// Index name, if this unit is an index.
    #[must_use]
    pub fn index_name(&self) -> Option<&str> {
        match self {
            Self::Table { .. } => None,
            Self::Index { index, .. } => Some(index),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table { table } => f.write_str(table),
            Self::Index { table, index } => write!(f, "{table}/{index}"),
        }
    }
}

/// Throughput direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Read capacity.
    Read,
    /// Write capacity.
    Write,
}

impl Direction {
    /// CloudWatch metric name for consumed capacity in this direction.
    #[must_use]
    pub fn consumed_metric_name(self) -> &'static str {
        match self {
            Self::Read => "ConsumedReadCapacityUnits",
            Self::Write => "ConsumedWriteCapacityUnits",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
        })
    }
}

/// Provisioned throughput of a table or index as reported by DynamoDB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProvisionedCapacity {
    /// Provisioned read capacity units.
    pub read: i64,
    /// Provisioned write capacity units.
    pub write: i64,
    /// Capacity decreases already applied today.
    pub decreases_today: i64,
}

impl ProvisionedCapacity {
    /// Whether the unit carries provisioned throughput at all.
    ///
    /// On-demand units report zero for both directions.
    #[must_use]
    pub fn is_provisioned(&self) -> bool {
        self.read > 0 && self.write > 0
    }
}

/// Capacity of a top-level table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableCapacity {
    /// Current provisioned throughput.
    pub capacity: ProvisionedCapacity,
    /// Whether the table is billed per request.
    pub on_demand: bool,
}

impl TableCapacity {
    /// Whether the adjuster can act on this table.
    #[must_use]
    pub fn is_adjustable(&self) -> bool {
        !self.on_demand && self.capacity.is_provisioned()
    }
}

/// Capacity of a secondary index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCapacity {
    /// Index name.
    pub index_name: String,
    /// Current provisioned throughput.
    pub capacity: ProvisionedCapacity,
}

/// One bucket of consumed capacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSample {
    /// Bucket start.
    pub timestamp: DateTime<Utc>,
    /// Units consumed over the whole bucket.
    pub sum: f64,
}

/// The time range and bucket size queried for consumption samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricWindow {
    /// Inclusive window start.
    pub start: DateTime<Utc>,
    /// Window end.
    pub end: DateTime<Utc>,
    /// Seconds per sample bucket.
    pub bucket_seconds: u32,
}

impl MetricWindow {
    /// The trailing [`LOOKBACK_MINUTES`] window ending at `end`.
    #[must_use]
    pub fn trailing(end: DateTime<Utc>, bucket_seconds: u32) -> Self {
        Self {
            start: end - Duration::minutes(LOOKBACK_MINUTES),
            end,
            bucket_seconds,
        }
    }
}
