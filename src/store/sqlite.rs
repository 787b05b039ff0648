use super::{PersistedState, ProfileStore};
use crate::error::Result;
use chrono::Utc;
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};

// Embed migrations from the migrations directory
refinery::embed_migrations!("migrations");

/// Key the single user's document is stored under
const STATE_KEY: &str = "user-state";

/// SQLite-backed key/value store holding the whole state as one JSON document
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database at `db_path` and runs migrations
    ///
    /// `":memory:"` gives a throwaway database.
    pub fn open(db_path: &str) -> Result<Self> {
        let mut conn = Connection::open(db_path)?;
        migrations::runner().run(&mut conn)?;
        debug!("Migrations completed successfully for {}", db_path);
        Ok(SqliteStore { conn })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Number of stored documents; at most one today
    pub fn count_documents(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl ProfileStore for SqliteStore {
    fn load(&mut self) -> Result<Option<PersistedState>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE key = ?1",
                [STATE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        debug!(
            "Loaded state document: {}",
            if body.is_some() { "found" } else { "none" }
        );
        body.as_deref().map(PersistedState::from_json).transpose()
    }

    fn save(&mut self, state: &PersistedState) -> Result<()> {
        let body = state.to_json()?;
        self.conn.execute(
            "INSERT INTO documents (key, schema_version, body, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET
                 schema_version = excluded.schema_version,
                 body = excluded.body,
                 updated_at = excluded.updated_at",
            params![STATE_KEY, state.schema_version, body, Utc::now().to_rfc3339()],
        )?;
        debug!("Saved state document ({} bytes)", body.len());
        Ok(())
    }
}
