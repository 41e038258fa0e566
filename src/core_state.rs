//! Shared application state handed to every HTTP handler.
//!
//! Holds no connection of its own: each request opens one through
//! `open_db`, so concurrent requests never share a SQLite handle and
//! serialize only on the database write lock.

use std::path::PathBuf;

use crate::config;
use crate::db;

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

pub struct CoreState {
    db_path: PathBuf,
}

impl CoreState {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// State for the configured database location.
    pub fn from_config() -> Self {
        Self::new(config::database_path())
    }

    /// Create the data directory and bring the schema up to date.
    /// Called once at startup, before the server accepts requests.
    pub fn initialize(&self) -> Result<(), CoreError> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        db::open_database(&self.db_path)?;
        tracing::info!(path = %self.db_path.display(), "Database ready");
        Ok(())
    }

    /// Open a fresh connection for one request. Expects `initialize` to
    /// have run; no migration happens here.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_connection(&self.db_path).map_err(CoreError::Database)
    }
}

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("carebook.db");
        let state = CoreState::new(&path);

        state.initialize().unwrap();
        assert!(path.exists());

        let conn = state.open_db().unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn each_open_returns_independent_connection() {
        let dir = tempfile::tempdir().unwrap();
        let state = CoreState::new(dir.path().join("carebook.db"));
        state.initialize().unwrap();

        let a = state.open_db().unwrap();
        let b = state.open_db().unwrap();
        a.execute_batch("BEGIN IMMEDIATE").unwrap();
        // The second connection can still read while the first holds the write lock.
        let tables = db::count_tables(&b).unwrap();
        assert!(tables >= 5);
        a.execute_batch("ROLLBACK").unwrap();
    }

    #[test]
    fn open_db_leaves_schema_to_initialize() {
        let dir = tempfile::tempdir().unwrap();
        let state = CoreState::new(dir.path().join("carebook.db"));

        let conn = state.open_db().unwrap();
        assert_eq!(db::count_tables(&conn).unwrap(), 0);
        drop(conn);

        state.initialize().unwrap();
        let conn = state.open_db().unwrap();
        assert_eq!(db::count_tables(&conn).unwrap(), 5);
    }

    #[test]
    fn initialize_reports_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let state = CoreState::new(blocker.join("carebook.db"));
        assert!(state.initialize().is_err());
    }
}
