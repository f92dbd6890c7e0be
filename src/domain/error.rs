//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent catalog and record violations.
/// None of them is fatal: callers report and carry on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid line (needs at least course number and title): {line}")]
    MalformedRecord { line: String },

    #[error("course {0} not found")]
    CourseNotFound(String),

    #[error("no courses loaded")]
    EmptyCatalog,
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
