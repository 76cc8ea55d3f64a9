//! The capacity adjustment heuristic.
//!
//! ```text
//! peak     = max(sample.sum / bucket_seconds)          (0 for an empty window)
//! adjusted = current
//!
//! if decreases_today < max_decreases_per_day:
//!     adjusted = ceil(peak * lower_multiple)
//!
//! if peak > current * raise_threshold:                 (original capacity)
//!     adjusted = ceil(peak * raise_multiple)
//!
//! adjusted = clamp(adjusted, minimum_capacity, maximum_capacity)
//! ```
//!
//! The lower pass fires even when the peak is zero, which walks idle units
//! down to the floor once per allowed decrease. The raise pass looks at the
//! capacity the unit had before the lower pass ran.

use crate::types::{MetricSample, ProvisionedCapacity};

/// Decision parameters, derived from [`crate::DynoscaleConfig::policy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingPolicy {
    /// Fraction of provisioned capacity above which capacity is raised.
    pub raise_threshold: f64,
    /// Raised capacity is `peak * raise_multiple`.
    pub raise_multiple: f64,
    /// Lowered capacity is `peak * lower_multiple`.
    pub lower_multiple: f64,
    /// Decreases allowed per day before the lower pass is skipped.
    pub max_decreases_per_day: i64,
    /// Floor for adjusted capacity.
    pub minimum_capacity: i64,
    /// Ceiling for adjusted capacity.
    pub maximum_capacity: i64,
}

/// Peak consumption per second over the window, per direction.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct Peaks {
    /// Peak consumed read units per second.
    pub read: f64,
    /// Peak consumed write units per second.
    pub write: f64,
}

/// Outcome of evaluating one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Target read capacity.
    pub read: i64,
    /// Target write capacity.
    pub write: i64,
    /// Whether the read target differs from the current read capacity.
    pub read_changed: bool,
    /// Whether the write target differs from the current write capacity.
    pub write_changed: bool,
}

impl Decision {
    /// Whether an update is needed.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.read_changed || self.write_changed
    }
}

/// Highest per-second consumption across the samples, or 0 for none.
#[must_use]
pub fn peak_per_second(samples: &[MetricSample], bucket_seconds: u32) -> f64 {
    let bucket = f64::from(bucket_seconds);
    samples
        .iter()
        .map(|s| s.sum / bucket)
        .fold(0.0, f64::max)
}

/// Adjusted capacity for a single direction.
#[must_use]
pub fn decide(current: i64, peak: f64, decreases_today: i64, policy: &ScalingPolicy) -> i64 {
    let mut adjusted = current;

    if decreases_today < policy.max_decreases_per_day {
        adjusted = ceil_units(peak * policy.lower_multiple);
    }

    #[allow(clippy::cast_precision_loss)]
    let raise_above = current as f64 * policy.raise_threshold;
    if peak > raise_above {
        adjusted = ceil_units(peak * policy.raise_multiple);
    }

    adjusted
        .max(policy.minimum_capacity)
        .min(policy.maximum_capacity)
}

/// Evaluate both directions of a unit.
#[must_use]
pub fn evaluate(capacity: &ProvisionedCapacity, peaks: Peaks, policy: &ScalingPolicy) -> Decision {
    let read = decide(capacity.read, peaks.read, capacity.decreases_today, policy);
    let write = decide(capacity.write, peaks.write, capacity.decreases_today, policy);
    Decision {
        read,
        write,
        read_changed: read != capacity.read,
        write_changed: write != capacity.write,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn ceil_units(value: f64) -> i64 {
    // `as` saturates, and the clamp that follows bounds the result.
    value.ceil() as i64
}
