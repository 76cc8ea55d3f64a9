//! Configuration management for Dynoscale.
//!
//! All configuration is driven by environment variables and is fixed for the
//! lifetime of the process. [`DynoscaleConfig::from_env`] validates every value
//! before any AWS call is made.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::decision::ScalingPolicy;
use crate::error::{DynoscaleError, DynoscaleResult};
use crate::types::AwsRegion;

/// Upper bound DynamoDB places on capacity decreases per day.
pub const MAX_DECREASES_CEILING: i64 = 4;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Process-wide Dynoscale configuration.
///
/// # Examples
///
/// ```
/// use dynoscale_core::DynoscaleConfig;
///
/// let config = DynoscaleConfig::default();
/// assert_eq!(config.bucket_seconds, 300);
/// assert!(!config.notifications_enabled());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct DynoscaleConfig {
    /// Fraction of provisioned capacity above which capacity is raised.
    #[builder(default = 0.90)]
    pub raise_threshold: f64,

    /// Raised capacity is `peak * raise_multiple`.
    #[builder(default = 1.40)]
    pub raise_multiple: f64,

    /// Lowered capacity is `peak * lower_multiple`.
    #[builder(default = 1.15)]
    pub lower_multiple: f64,

    /// Decreases allowed per unit per day before the lower pass is skipped.
    #[builder(default = 1)]
    pub max_decreases_per_day: i64,

    /// Floor for adjusted capacity.
    #[builder(default = 3)]
    pub minimum_capacity: i64,

    /// Ceiling for adjusted capacity.
    #[builder(default = 5000)]
    pub maximum_capacity: i64,

    /// Verified SES sender address. Empty disables notifications.
    #[builder(default, setter(into))]
    pub sender: String,

    /// Notification recipients. Empty disables notifications.
    #[builder(default)]
    pub recipients: Vec<String>,

    /// Seconds per consumption sample. Must be a multiple of 60.
    #[builder(default = 300)]
    pub bucket_seconds: u32,

    /// Compute and report decisions without updating tables or sending mail.
    #[builder(default = false)]
    pub dry_run: bool,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Log output format.
    #[builder(default)]
    pub log_format: LogFormat,

    /// Endpoint override for every AWS client (local emulators).
    #[builder(default)]
    pub endpoint_url: Option<String>,

    /// Region override; the SDK default chain is used when unset.
    #[builder(default)]
    pub region: Option<AwsRegion>,
}

impl Default for DynoscaleConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DynoscaleConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DYNOSCALE_RAISE_THRESHOLD` | `0.90` |
    /// | `DYNOSCALE_RAISE_MULTIPLE` | `1.40` |
    /// | `DYNOSCALE_LOWER_MULTIPLE` | `1.15` |
    /// | `DYNOSCALE_MAX_DECREASES_PER_DAY` | `1` |
    /// | `DYNOSCALE_MIN_CAPACITY` | `3` |
    /// | `DYNOSCALE_MAX_CAPACITY` | `5000` |
    /// | `DYNOSCALE_SENDER` | *(empty)* |
    /// | `DYNOSCALE_RECIPIENTS` | *(empty, comma-separated)* |
    /// | `DYNOSCALE_BUCKET_SECONDS` | `300` |
    /// | `DYNOSCALE_DRY_RUN` | `false` |
    /// | `LOG_LEVEL` | `info` |
    /// | `LOG_FORMAT` | `text` |
    /// | `AWS_ENDPOINT_URL` | *(unset)* |
    /// | `AWS_REGION` | *(unset)* |
    pub fn from_env() -> DynoscaleResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> DynoscaleResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(v) = get("DYNOSCALE_RAISE_THRESHOLD") {
            config.raise_threshold = parse_value("DYNOSCALE_RAISE_THRESHOLD", &v)?;
        }
        if let Some(v) = get("DYNOSCALE_RAISE_MULTIPLE") {
            config.raise_multiple = parse_value("DYNOSCALE_RAISE_MULTIPLE", &v)?;
        }
        if let Some(v) = get("DYNOSCALE_LOWER_MULTIPLE") {
            config.lower_multiple = parse_value("DYNOSCALE_LOWER_MULTIPLE", &v)?;
        }
        if let Some(v) = get("DYNOSCALE_MAX_DECREASES_PER_DAY") {
            config.max_decreases_per_day = parse_value("DYNOSCALE_MAX_DECREASES_PER_DAY", &v)?;
        }
        if let Some(v) = get("DYNOSCALE_MIN_CAPACITY") {
            config.minimum_capacity = parse_value("DYNOSCALE_MIN_CAPACITY", &v)?;
        }
        if let Some(v) = get("DYNOSCALE_MAX_CAPACITY") {
            config.maximum_capacity = parse_value("DYNOSCALE_MAX_CAPACITY", &v)?;
        }
        if let Some(v) = get("DYNOSCALE_SENDER") {
            config.sender = v;
        }
        if let Some(v) = get("DYNOSCALE_RECIPIENTS") {
            config.recipients = parse_list(&v);
        }
        if let Some(v) = get("DYNOSCALE_BUCKET_SECONDS") {
            config.bucket_seconds = parse_value("DYNOSCALE_BUCKET_SECONDS", &v)?;
        }
        if let Some(v) = get("DYNOSCALE_DRY_RUN") {
            config.dry_run = parse_bool(&v);
        }
        if let Some(v) = get("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = get("LOG_FORMAT") {
            config.log_format = parse_value("LOG_FORMAT", &v)?;
        }
        if let Some(v) = get("AWS_ENDPOINT_URL") {
            config.endpoint_url = Some(v);
        }
        if let Some(v) = get("AWS_REGION") {
            config.region = Some(AwsRegion::new(v));
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable by the decision algorithm.
    pub fn validate(&self) -> DynoscaleResult<()> {
        if self.bucket_seconds == 0 || self.bucket_seconds % 60 != 0 {
            return Err(DynoscaleError::Config(format!(
                "bucket seconds must be a positive multiple of 60, got {}",
                self.bucket_seconds
            )));
        }
        for (name, value) in [
            ("raise threshold", self.raise_threshold),
            ("raise multiple", self.raise_multiple),
            ("lower multiple", self.lower_multiple),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(DynoscaleError::Config(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.minimum_capacity < 1 || self.minimum_capacity > self.maximum_capacity {
            return Err(DynoscaleError::Config(format!(
                "capacity bounds must satisfy 1 <= minimum <= maximum, got [{}, {}]",
                self.minimum_capacity, self.maximum_capacity
            )));
        }
        if !(0..=MAX_DECREASES_CEILING).contains(&self.max_decreases_per_day) {
            return Err(DynoscaleError::Config(format!(
                "max decreases per day must be between 0 and {MAX_DECREASES_CEILING}, got {}",
                self.max_decreases_per_day
            )));
        }
        Ok(())
    }

    /// The decision parameters carried by this configuration.
    #[must_use]
    pub fn policy(&self) -> ScalingPolicy {
        ScalingPolicy {
            raise_threshold: self.raise_threshold,
            raise_multiple: self.raise_multiple,
            lower_multiple: self.lower_multiple,
            max_decreases_per_day: self.max_decreases_per_day,
            minimum_capacity: self.minimum_capacity,
            maximum_capacity: self.maximum_capacity,
        }
    }

    /// Whether change notifications are delivered.
    #[must_use]
    pub fn notifications_enabled(&self) -> bool {
        !self.sender.is_empty() && !self.recipients.is_empty()
    }
}

fn parse_value<T>(key: &str, value: &str) -> DynoscaleResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .parse()
        .map_err(|e| DynoscaleError::Config(format!("invalid {key}={value}: {e}")))
}

/// Parse a string as a boolean, accepting `"1"`, `"true"` and `"yes"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
