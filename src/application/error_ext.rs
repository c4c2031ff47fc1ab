//! Error conversion helpers for common I/O operations
//!
//! Provides extension traits for cleaner error handling with context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add a free-form context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// self.cmd.run("svn", &args).with_context("run svn info")?;
    /// ```
    fn with_context(self, context: impl Into<String>) -> ApplicationResult<T>;

    /// Add path context to an I/O error.
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_context(self, context: impl Into<String>) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: context.into(),
            source: Box::new(e),
        })
    }

    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.with_context(format!("{}: {}", action, path.display()))
    }
}
