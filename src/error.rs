//! Core error kinds for tree construction, mutation and iteration.

use thiserror::Error;

/// Errors raised by the tree, node and iterator operations.
///
/// All of them signal a misuse at the call site. Nothing here is transient,
/// so callers should not retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A handle or value passed in cannot be used for the requested operation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced element is not where the operation expected it.
    #[error("no such element: {0}")]
    NoSuchElement(String),

    /// `remove()` without a preceding `next()`, or twice in a row.
    #[error("illegal state: {0}")]
    IllegalState(String),

    #[error("iteration has no more elements")]
    Exhausted,
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

impl TreeError {
    pub(crate) fn remove_without_next() -> Self {
        TreeError::IllegalState(
            "remove() must follow a successful next() and may only be called once".to_string(),
        )
    }
}
