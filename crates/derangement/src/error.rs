//! Errors raised while drawing derangements.

use thiserror::Error;

/// Errors returned by the derangement sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DerangementError {
    /// Fewer than two items cannot be deranged.
    #[error("a derangement needs at least 2 items, got {count}")]
    TooFewItems {
        /// Number of items supplied.
        count: usize,
    },
}
