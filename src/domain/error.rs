//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid values caught before svn runs.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid revision: {0:?}")]
    InvalidRevision(String),
}
