//! Error taxonomy for the reconciliation core
//!
//! The core never aborts a whole run: malformed records are skipped, sources
//! that fail shape normalization are dropped, and invariant violations are
//! logged and excluded from aggregation.

use thiserror::Error;

/// Errors surfaced by the reconciliation core
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A single extracted record failed to parse and was skipped
    #[error("malformed record from {source_id}: {detail}")]
    MalformedSourceRecord { source_id: String, detail: String },

    /// A source's top-level shape differed from expectation
    #[error("source shape mismatch: expected {expected}, found {found}")]
    StructuralShapeMismatch {
        expected: &'static str,
        found: String,
    },

    /// A conflict referenced an API absent from both live indexes
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

/// Result alias for reconciliation operations
pub type Result<T> = std::result::Result<T, ReconcileError>;
