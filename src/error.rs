//! Library-wide error types.
//!
//! Subsystem modules use specific error types via `thiserror`; callers
//! that don't care which subsystem failed can handle the top-level
//! [`Error`] instead.
//!
//! # Design
//!
//! - [`Error`]: top-level library error enum
//! - [`crate::export::ExportError`]: detailed export-subsystem errors
//! - All errors implement `std::error::Error` for compatibility

/// Library-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Playlist export error
    #[error("Export error: {0}")]
    Export(#[from] crate::export::ExportError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, crate::export::ExportError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Export(e).context(ctx))
    }
}
