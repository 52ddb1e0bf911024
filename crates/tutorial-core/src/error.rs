//! # Validation Errors
//!
//! Structured errors raised when a payload or identifier does not satisfy
//! the Tutorial invariants. Built with `thiserror`.

use thiserror::Error;

/// Errors raised while validating Tutorial input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The create payload carried no title at all.
    #[error("title is required")]
    MissingTitle,

    /// A title was supplied but is empty after trimming whitespace.
    #[error("title must not be empty")]
    EmptyTitle,

    /// The identifier is not a well-formed UUID.
    #[error("invalid tutorial id: \"{0}\"")]
    InvalidId(String),
}
