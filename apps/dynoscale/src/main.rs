//! Dynoscale - DynamoDB provisioned throughput adjuster.
//!
//! Each process run is one invocation: every table and global secondary
//! index is evaluated against its trailing day of consumed capacity and
//! updated if needed. Scheduling is left to the caller (cron, EventBridge
//! Scheduler, a Kubernetes CronJob).
//!
//! # Usage
//!
//! ```text
//! DYNOSCALE_SENDER=ops@example.com DYNOSCALE_RECIPIENTS=dba@example.com dynoscale
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DYNOSCALE_RAISE_THRESHOLD` | `0.90` | Raise when peak exceeds this fraction of capacity |
//! | `DYNOSCALE_RAISE_MULTIPLE` | `1.40` | Raised capacity as a multiple of peak |
//! | `DYNOSCALE_LOWER_MULTIPLE` | `1.15` | Lowered capacity as a multiple of peak |
//! | `DYNOSCALE_MAX_DECREASES_PER_DAY` | `1` | Decreases allowed per unit per day (at most 4) |
//! | `DYNOSCALE_MIN_CAPACITY` | `3` | Capacity floor |
//! | `DYNOSCALE_MAX_CAPACITY` | `5000` | Capacity ceiling |
//! | `DYNOSCALE_SENDER` | *(empty)* | Verified SES sender; empty disables mail |
//! | `DYNOSCALE_RECIPIENTS` | *(empty)* | Comma-separated recipients; empty disables mail |
//! | `DYNOSCALE_BUCKET_SECONDS` | `300` | Metric period, a multiple of 60 |
//! | `DYNOSCALE_DRY_RUN` | `false` | Report decisions without applying them |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `LOG_FORMAT` | `text` | `text` or `json` |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |
//! | `AWS_ENDPOINT_URL` | *(unset)* | Endpoint override for local emulators |
//! | `AWS_REGION` | *(SDK chain)* | Region override |

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dynoscale_aws::{aws_services, load_sdk_config};
use dynoscale_core::{CapacityAdjuster, DynoscaleConfig, LogFormat};

/// Version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str, format: LogFormat) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = DynoscaleConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config.log_level, config.log_format)?;

    info!(
        version = VERSION,
        dry_run = config.dry_run,
        bucket_seconds = config.bucket_seconds,
        notifications = config.notifications_enabled(),
        "starting dynoscale",
    );

    let sdk_config = load_sdk_config(&config).await;
    let adjuster = CapacityAdjuster::new(config, aws_services(&sdk_config));

    let report = adjuster
        .run()
        .await
        .context("capacity adjustment aborted")?;

    let changed = report.iter().filter(|s| s.is_changed()).count();
    info!(
        units = report.len(),
        changed, "capacity adjustment complete"
    );

    Ok(())
}
