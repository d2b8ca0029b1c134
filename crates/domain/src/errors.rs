//! Domain error types.

use thiserror::Error;

/// Error type collaborators hand back to the domain.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures surfaced while evaluating a spend cap.
///
/// Configuration problems are never errors; only collaborator failures are,
/// and they carry the collaborator error as their source.
#[derive(Debug, Error)]
pub enum SpendLimitError {
    #[error("user attribute store failed: {0}")]
    AttributeStore(#[source] BoxError),

    #[error("order query failed: {0}")]
    OrderQuery(#[source] BoxError),
}
