pub mod sqlite;
pub mod repository;

pub use sqlite::*;
pub use repository::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),
}

impl DatabaseError {
    /// Map SQLite constraint failures (UNIQUE, CHECK, FK) to `ConstraintViolation`.
    pub fn from_write(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref code, ref msg)
                if code.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                DatabaseError::ConstraintViolation(
                    msg.clone().unwrap_or_else(|| code.to_string()),
                )
            }
            other => DatabaseError::Sqlite(other),
        }
    }
}
