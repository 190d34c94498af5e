//! Snapshot persistence gateway.
//!
//! # Responsibility
//! - Store one serialized snapshot per fixed storage key.
//! - Turn missing or corrupt payloads into default state on load.
//!
//! # Invariants
//! - `load_snapshot` never fails; every failure degrades to defaults and
//!   is reported through `LoadOrigin` plus a log event.
//! - `save_snapshot` surfaces failures to the caller, which decides
//!   whether to swallow them.

use crate::db::DbError;
use crate::model::snapshot::Snapshot;
use log::{debug, error, info, warn};
use rusqlite::{params, Connection};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key the session snapshot lives under.
pub const SNAPSHOT_KEY: &str = "dailyQuestsApp";

pub type RepoResult<T> = Result<T, SnapshotRepoError>;

/// Persistence transport and encoding errors.
#[derive(Debug)]
pub enum SnapshotRepoError {
    Db(DbError),
    Encode(serde_json::Error),
    /// Storage refused the write for a reason outside SQLite.
    Unavailable(String),
}

impl Display for SnapshotRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::Unavailable(message) => write!(f, "snapshot storage unavailable: {message}"),
        }
    }
}

impl Error for SnapshotRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl SnapshotRepoError {
    /// Whether the write failed only because another process held the lock.
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_locked())
    }
}

impl From<DbError> for SnapshotRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SnapshotRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::from(value))
    }
}

impl From<serde_json::Error> for SnapshotRepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Key-value transport for serialized snapshots.
pub trait SnapshotRepository {
    fn read_snapshot(&self, key: &str) -> RepoResult<Option<String>>;
    fn write_snapshot(&self, key: &str, payload: &str) -> RepoResult<()>;
}

impl<R: SnapshotRepository + ?Sized> SnapshotRepository for &R {
    fn read_snapshot(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).read_snapshot(key)
    }

    fn write_snapshot(&self, key: &str, payload: &str) -> RepoResult<()> {
        (**self).write_snapshot(key, payload)
    }
}

/// SQLite-backed snapshot repository.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn read_snapshot(&self, key: &str) -> RepoResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM snapshots WHERE storage_key = ?1;")?;
        let mut rows = stmt.query([key])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }

    fn write_snapshot(&self, key: &str, payload: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO snapshots (storage_key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(storage_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![key, payload],
        )?;
        Ok(())
    }
}

/// Process-local repository; state is lost when dropped.
#[derive(Debug, Default)]
pub struct MemorySnapshotRepository {
    entries: RefCell<HashMap<String, String>>,
}

impl MemorySnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw payload, bypassing encoding.
    pub fn with_payload(key: &str, payload: impl Into<String>) -> Self {
        let repo = Self::new();
        repo.entries
            .borrow_mut()
            .insert(key.to_string(), payload.into());
        repo
    }
}

impl SnapshotRepository for MemorySnapshotRepository {
    fn read_snapshot(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn write_snapshot(&self, key: &str, payload: &str) -> RepoResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }
}

/// Where the state of a freshly opened session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// A stored snapshot was decoded.
    Restored,
    /// Nothing stored under the key yet.
    Missing,
    /// A payload existed but could not be decoded.
    Corrupt,
    /// The storage read itself failed.
    Unavailable,
}

/// Loads the snapshot under `SNAPSHOT_KEY`, falling back to defaults.
pub fn load_snapshot<R: SnapshotRepository + ?Sized>(repo: &R) -> (Snapshot, LoadOrigin) {
    match repo.read_snapshot(SNAPSHOT_KEY) {
        Ok(Some(payload)) => match Snapshot::from_json(&payload) {
            Ok(snapshot) => {
                info!(
                    "event=snapshot_load module=snapshot_repo status=ok quests={} payload_bytes={}",
                    snapshot.quests.len(),
                    payload.len()
                );
                (snapshot, LoadOrigin::Restored)
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=snapshot_repo status=corrupt payload_bytes={} error={}",
                    payload.len(),
                    err
                );
                (Snapshot::default(), LoadOrigin::Corrupt)
            }
        },
        Ok(None) => {
            info!("event=snapshot_load module=snapshot_repo status=missing");
            (Snapshot::default(), LoadOrigin::Missing)
        }
        Err(err) => {
            error!("event=snapshot_load module=snapshot_repo status=error error={err}");
            (Snapshot::default(), LoadOrigin::Unavailable)
        }
    }
}

/// Encodes and writes `snapshot` under `SNAPSHOT_KEY`.
pub fn save_snapshot<R: SnapshotRepository + ?Sized>(
    repo: &R,
    snapshot: &Snapshot,
) -> RepoResult<()> {
    let payload = snapshot.to_json()?;
    repo.write_snapshot(SNAPSHOT_KEY, &payload)?;
    debug!(
        "event=snapshot_save module=snapshot_repo status=ok payload_bytes={}",
        payload.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_snapshot, LoadOrigin, MemorySnapshotRepository, SNAPSHOT_KEY};

    #[test]
    fn empty_repository_loads_defaults() {
        let repo = MemorySnapshotRepository::new();
        let (snapshot, origin) = load_snapshot(&repo);
        assert_eq!(origin, LoadOrigin::Missing);
        assert!(snapshot.quests.is_empty());
        assert_eq!(snapshot.progression.combo, 1);
    }

    #[test]
    fn garbage_payload_is_treated_as_absent() {
        let repo = MemorySnapshotRepository::with_payload(SNAPSHOT_KEY, "{not json");
        let (snapshot, origin) = load_snapshot(&repo);
        assert_eq!(origin, LoadOrigin::Corrupt);
        assert_eq!(snapshot.progression.xp, 0);
    }
}
