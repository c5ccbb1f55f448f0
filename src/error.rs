//! Error types for the persistence and logging surfaces.
//!
//! The settings store itself never surfaces these: reads degrade to defaults
//! and `save` reports failure as a boolean. They exist for the option store
//! and debug logger, where callers may want the underlying cause.

use thiserror::Error;

/// Failure in the option store or the debug logger.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration error: {0}")]
    Migration(#[from] refinery::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
