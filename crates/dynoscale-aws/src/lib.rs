//! AWS bindings for the Dynoscale collaborator traits.
//!
//! | Trait | AWS call |
//! |-------|----------|
//! | `ResourceRegistry` | DynamoDB `ListTables` |
//! | `CapacityMetadata` | DynamoDB `DescribeTable` |
//! | `CapacityManager` | DynamoDB `UpdateTable` |
//! | `ConsumptionMetrics` | CloudWatch `GetMetricStatistics` |
//! | `Notifier` | SES `SendEmail` |

pub mod client;
pub mod cloudwatch;
pub mod dynamodb;
mod error;
pub mod ses;

pub use client::{aws_services, load_sdk_config, services_from_clients};
pub use cloudwatch::CloudWatchMetrics;
pub use dynamodb::DynamoDbTables;
pub use ses::SesNotifier;
