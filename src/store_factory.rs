use crate::error::Result;
use crate::store::{MemoryStore, ProfileStore, SqliteStore};
use std::path::PathBuf;

/// Default database file, relative to the working directory
pub const DEFAULT_DB_PATH: &str = "study_coach.db";

/// Store configuration
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Whether to keep state in memory only
    pub is_test_mode: bool,
    /// Custom database file path (ignored if in test mode)
    pub custom_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Gets the effective database path
    pub fn get_path(&self) -> String {
        if self.is_test_mode {
            ":memory:".to_string()
        } else {
            self.custom_path
                .as_ref()
                .map(|path| path.to_string_lossy().into_owned())
                .unwrap_or_else(|| DEFAULT_DB_PATH.to_string())
        }
    }
}

/// Factory for creating stores
pub struct StoreFactory;

impl StoreFactory {
    /// Creates a SQLite store with the specified configuration
    pub fn create(config: &StoreConfig) -> Result<SqliteStore> {
        SqliteStore::open(&config.get_path())
    }

    /// Creates whichever store suits the configuration: memory in test mode, SQLite otherwise
    pub fn create_boxed(config: &StoreConfig) -> Result<Box<dyn ProfileStore>> {
        if config.is_test_mode {
            Ok(Box::new(MemoryStore::new()))
        } else {
            Ok(Box::new(Self::create(config)?))
        }
    }
}
