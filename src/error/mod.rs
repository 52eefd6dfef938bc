//! Error types for chunkvault.

use std::collections::TryReserveError;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while chunking, storing or restoring data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A working buffer could not be allocated.
    #[error("out of memory: {0}")]
    NoMemory(#[from] TryReserveError),

    /// A described internal failure.
    #[error("{0}")]
    Message(String),

    /// The persistence layer failed while performing an operation.
    #[error("database error while {context}: {source}")]
    Database {
        /// What was being attempted, e.g. "storing a data chunk".
        context: &'static str,
        /// The underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },

    /// A lookup by key found nothing.
    #[error("{what} not found: {key}")]
    NotFound {
        /// Kind of record looked up.
        what: &'static str,
        /// The key that missed.
        key: String,
    },

    /// An I/O error occurred while reading input or writing output.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data does not reconstruct the content it claims to.
    #[error("corruption: {0}")]
    Corruption(String),

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },
}

impl Error {
    /// Builds an [`Error::Message`] from anything printable.
    pub fn msg(message: impl Into<String>) -> Self {
        Error::Message(message.into())
    }

    /// Builds an [`Error::NotFound`].
    pub fn not_found(what: &'static str, key: impl ToString) -> Self {
        Error::NotFound {
            what,
            key: key.to_string(),
        }
    }

    /// Returns true for lookup misses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Attaches the operation being attempted to a `rusqlite` result.
pub(crate) trait DbContext<T> {
    fn context(self, context: &'static str) -> Result<T>;
}

impl<T> DbContext<T> for std::result::Result<T, rusqlite::Error> {
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|source| Error::Database { context, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_display_not_found() {
        let err = Error::not_found("revision", 42);
        assert_eq!(err.to_string(), "revision not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_database_context() {
        let res: std::result::Result<(), rusqlite::Error> =
            Err(rusqlite::Error::QueryReturnedNoRows);
        let err = res.context("finding a data chunk").unwrap_err();
        assert!(err.to_string().starts_with("database error while finding a data chunk"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_no_memory() {
        let mut v: Vec<u8> = Vec::new();
        let err: Error = v.try_reserve_exact(usize::MAX).unwrap_err().into();
        assert!(matches!(err, Error::NoMemory(_)));
    }
}
