//! Error types
//!
//! Only configuration and registry bookkeeping can fail. Gravity evaluation
//! and controller steps never return errors: degenerate input produces zero
//! vectors instead.

use thiserror::Error;

use crate::gravity::SourceId;

/// Rejected locomotion configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
}

/// Misuse of the [`GravityField`](crate::gravity::GravityField) registry.
///
/// These are programmer errors; callers are expected to `expect()` them
/// rather than recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GravityFieldError {
    #[error("gravity source {0:?} is not registered")]
    UnknownSource(SourceId),
}
