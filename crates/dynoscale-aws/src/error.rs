//! Mapping of AWS SDK failures into [`DynoscaleError`].

use std::error::Error;
use std::fmt;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use dynoscale_core::DynoscaleError;

/// Wrap an SDK error, keeping the full source chain in the message.
pub(crate) fn sdk_error<E: Error>(
    service: &'static str,
    operation: &'static str,
    err: E,
) -> DynoscaleError {
    DynoscaleError::service(service, operation, DisplayErrorContext(err))
}

/// Wrap a request that could not be built before it was sent.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn build_error<E: fmt::Display>(
    service: &'static str,
    operation: &'static str,
    err: E,
) -> DynoscaleError {
    DynoscaleError::service(service, operation, format!("invalid request: {err}"))
}
