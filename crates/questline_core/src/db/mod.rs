//! SQLite storage for the snapshot store.
//!
//! # Responsibility
//! - Open connections with the full schema applied.
//! - Classify SQLite failures so callers can tell a held lock from damage.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A lock held by another process surfaces as `DbError::Locked` once the
//!   busy timeout has elapsed, never as a generic SQLite error.

use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Storage-level failures.
#[derive(Debug)]
pub enum DbError {
    /// Another connection (usually a second questline process) held the
    /// database past the busy timeout.
    Locked(rusqlite::Error),
    Sqlite(rusqlite::Error),
    /// The file was migrated by a newer questline build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Locked(_))
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locked(err) => write!(f, "snapshot database is locked: {err}"),
            Self::Sqlite(err) => write!(f, "snapshot database error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "snapshot database uses schema {db_version}, this build understands up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Locked(err) | Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => Self::Locked(value),
            _ => Self::Sqlite(value),
        }
    }
}
