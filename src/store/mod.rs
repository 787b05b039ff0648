//! Persistence boundary
//!
//! The engine reads and writes one [`PersistedState`] document wholesale
//! through [`ProfileStore`]; adapters decide where it lives.

mod document;
mod memory;
mod sqlite;

pub use document::{CURRENT_SCHEMA_VERSION, PersistedState};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::Result;

/// Load/save port for the user's persisted state
pub trait ProfileStore: Send {
    /// Returns `None` when nothing has been saved yet
    fn load(&mut self) -> Result<Option<PersistedState>>;

    /// Replaces the stored document
    fn save(&mut self, state: &PersistedState) -> Result<()>;
}

impl<S: ProfileStore + ?Sized> ProfileStore for Box<S> {
    fn load(&mut self) -> Result<Option<PersistedState>> {
        (**self).load()
    }

    fn save(&mut self, state: &PersistedState) -> Result<()> {
        (**self).save(state)
    }
}

impl<S: ProfileStore + ?Sized> ProfileStore for &mut S {
    fn load(&mut self) -> Result<Option<PersistedState>> {
        (**self).load()
    }

    fn save(&mut self, state: &PersistedState) -> Result<()> {
        (**self).save(state)
    }
}
