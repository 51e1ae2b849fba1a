//! Error types for the bundled data sources.
//!
//! The query engine itself never fails: it propagates whatever error its
//! [`DataSource`](crate::DataSource) reports, unchanged.

use thiserror::Error;

/// Errors raised by [`SharedSource`](crate::SharedSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// A writer panicked while holding the store lock.
    #[error("record store lock poisoned while {operation}")]
    Poisoned { operation: &'static str },
}

/// Result type for shared source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
