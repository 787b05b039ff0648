use thiserror::Error;

/// Failures of the persistence boundary; the engine itself never fails
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] refinery::Error),
    /// Stored document could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Document written by a newer version of the engine
    #[error("Unsupported schema version {found} (newest supported is {supported})")]
    UnsupportedSchema { found: u64, supported: u32 },
}

/// Store result type
pub type Result<T> = std::result::Result<T, StoreError>;
