use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, Transaction, TransactionBehavior};

use super::DatabaseError;

/// How long a writer waits for the database lock before giving up.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a SQLite connection to the given path and run migrations
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

/// Open a connection to an already-migrated database.
///
/// Per-request path: the schema is brought up to date once at startup,
/// so this only applies the connection pragmas.
pub fn open_connection(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    configure_pragmas(&conn)?;
    Ok(conn)
}

/// Open an in-memory database (for testing)
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    configure_pragmas(&conn)?;
    run_migrations(&conn)?;
    Ok(conn)
}

fn configure_pragmas(conn: &Connection) -> Result<(), DatabaseError> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;"
    )?;
    Ok(())
}

/// Start a write transaction that takes the database write lock up front.
///
/// Concurrent writers queue on the lock (bounded by `BUSY_TIMEOUT`) instead
/// of interleaving their read-check-then-write sequences.
pub fn begin_immediate(conn: &Connection) -> Result<Transaction<'_>, DatabaseError> {
    Ok(Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?)
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_current_version(conn)?;

    let migrations: Vec<(i64, &str)> = vec![
        (1, include_str!("../../resources/migrations/001_initial.sql")),
    ];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql).map_err(|e| DatabaseError::MigrationFailed {
                version,
                reason: e.to_string(),
            })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet).
/// Read failures propagate so a busy database is never re-migrated.
fn get_current_version(conn: &Connection) -> Result<i64, DatabaseError> {
    let has_table: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;
    if !has_table {
        return Ok(0);
    }
    let version: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(version.unwrap_or(0))
}

/// Count tables in the database (for verification)
pub fn count_tables(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_initializes_all_tables() {
        let conn = open_memory_database().unwrap();
        // schema_version + slots + appointments + treatment_records + timeline_events
        let count = count_tables(&conn).unwrap();
        assert_eq!(count, 5);
    }

    #[test]
    fn schema_version_is_current() {
        let conn = open_memory_database().unwrap();
        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn migration_idempotent() {
        let conn = open_memory_database().unwrap();
        let result = run_migrations(&conn);
        assert!(result.is_ok());
    }

    #[test]
    fn foreign_keys_enabled() {
        let conn = open_memory_database().unwrap();
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn file_database_reopens_without_remigrating() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carebook.db");
        drop(open_database(&path).unwrap());
        let conn = open_database(&path).unwrap();
        let versions: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn fresh_database_reports_version_zero() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_current_version(&conn).unwrap(), 0);
        run_migrations(&conn).unwrap();
        assert_eq!(get_current_version(&conn).unwrap(), 1);
    }

    #[test]
    fn version_read_failure_is_not_treated_as_empty_schema() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE schema_version (applied_at TEXT);")
            .unwrap();

        let err = run_migrations(&conn).unwrap_err();
        assert!(matches!(err, DatabaseError::Sqlite(_)));
        assert_eq!(count_tables(&conn).unwrap(), 1);
    }

    #[test]
    fn open_connection_does_not_migrate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("carebook.db");

        let conn = open_connection(&path).unwrap();
        assert_eq!(count_tables(&conn).unwrap(), 0);
        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn immediate_transaction_rolls_back_on_drop() {
        let conn = open_memory_database().unwrap();
        {
            let tx = begin_immediate(&conn).unwrap();
            tx.execute(
                "INSERT INTO slots (id, doctor_id, day, label) VALUES ('s', 'd', '2024-06-10', 'x')",
                [],
            )
            .unwrap();
        }
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM slots", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
