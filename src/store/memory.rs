use super::{PersistedState, ProfileStore};
use crate::error::Result;

/// Keeps the serialized document in memory
///
/// Goes through the same JSON encoding as the durable adapters so that
/// anything which survives a save/load here survives one on disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Option<String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an already-serialized document, e.g. one written by an older client
    pub fn with_document(json: &str) -> Self {
        MemoryStore {
            document: Some(json.to_string()),
            saves: 0,
        }
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl ProfileStore for MemoryStore {
    fn load(&mut self) -> Result<Option<PersistedState>> {
        self.document
            .as_deref()
            .map(PersistedState::from_json)
            .transpose()
    }

    fn save(&mut self, state: &PersistedState) -> Result<()> {
        self.document = Some(state.to_json()?);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_loads_nothing() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let state = PersistedState::default();

        store.save(&state).unwrap();

        assert_eq!(store.load().unwrap(), Some(state));
        assert_eq!(store.save_count(), 1);
        assert!(store.document().unwrap().contains("schemaVersion"));
    }

    #[test]
    fn test_corrupt_document_is_reported() {
        let mut store = MemoryStore::with_document("{");
        assert!(store.load().is_err());
    }
}
