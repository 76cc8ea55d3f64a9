//! Core of Dynoscale: the provisioned-capacity adjustment loop.
//!
//! This crate holds everything that does not talk to AWS directly: the
//! environment-driven configuration, the decision heuristic, the per-unit
//! summary record, the collaborator traits, and the [`CapacityAdjuster`]
//! that walks every table and index once per invocation.

mod adjuster;
mod config;
pub mod decision;
mod error;
pub mod service;
mod summary;
mod types;

pub use adjuster::CapacityAdjuster;
pub use config::{DynoscaleConfig, LogFormat, MAX_DECREASES_CEILING};
pub use decision::{Decision, Peaks, ScalingPolicy};
pub use error::{DynoscaleError, DynoscaleResult};
pub use service::Services;
pub use summary::UnitSummary;
pub use types::{
    AwsRegion, Direction, IndexCapacity, LOOKBACK_MINUTES, MetricSample, MetricWindow,
    ProvisionedCapacity, TableCapacity, Unit,
};
