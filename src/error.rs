//! Error types returned by the analytics core.

use thiserror::Error;

/// Failures raised by record construction, model fitting, prediction and
/// tier table validation.
///
/// The core never logs or recovers from these; callers decide how to report them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("{operation} requires at least one submission")]
    EmptyInput { operation: &'static str },

    #[error("feature count mismatch: model expects {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("invalid submission field `{field}`: {reason}")]
    InvalidRecord { field: &'static str, reason: String },

    #[error("pseudo-inverse failed: {0}")]
    Decomposition(String),

    #[error("invalid tier `{name}`: {reason}")]
    InvalidTier { name: String, reason: String },

    #[error("tiers `{first}` and `{second}` have overlapping rank ranges")]
    OverlappingTiers { first: String, second: String },
}
