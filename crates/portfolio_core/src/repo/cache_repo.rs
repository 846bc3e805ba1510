//! Project cache store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the last-known project list under a single well-known key.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save_projects` fully overwrites the stored value; there are no partial
//!   writes and no versioning.
//! - An unparsable stored value is treated as absent (logged), matching the
//!   cache-corruption recovery rule.

use crate::db::{migrations::latest_version, DbError};
use crate::model::project::Project;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed key holding the JSON-serialized project list.
pub const PROJECT_LIST_CACHE_KEY: &str = "portfolio_projects";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for cache persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialization(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(message) => {
                write!(f, "failed to serialize project list: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "cache connection not migrated: expected schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "cache connection is missing required table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Local cache store for the project list.
///
/// Mirrors the browser-storage interface the store was designed around:
/// a serialized string value under one fixed key.
pub trait ProjectCacheRepository {
    /// Loads the cached list. `None` when nothing is stored or the stored
    /// value is corrupt.
    fn load_projects(&self) -> RepoResult<Option<Vec<Project>>>;
    /// Overwrites the cached list with the given one.
    fn save_projects(&self, projects: &[Project]) -> RepoResult<()>;
    /// Removes the cached list entirely.
    fn clear_projects(&self) -> RepoResult<()>;
}

/// SQLite-backed cache store.
pub struct SqliteCacheRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCacheRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ProjectCacheRepository for SqliteCacheRepository<'_> {
    fn load_projects(&self) -> RepoResult<Option<Vec<Project>>> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_cache WHERE key = ?1;",
                [PROJECT_LIST_CACHE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = stored else {
            return Ok(None);
        };

        match serde_json::from_str::<Vec<Project>>(&raw) {
            Ok(projects) => Ok(Some(projects)),
            Err(err) => {
                // Corrupt value: discard and treat as absent.
                warn!(
                    "event=cache_load module=repo status=corrupt key={} error={}",
                    PROJECT_LIST_CACHE_KEY, err
                );
                Ok(None)
            }
        }
    }

    fn save_projects(&self, projects: &[Project]) -> RepoResult<()> {
        let serialized = serde_json::to_string(projects)
            .map_err(|err| RepoError::Serialization(err.to_string()))?;

        self.conn.execute(
            "INSERT INTO kv_cache (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![PROJECT_LIST_CACHE_KEY, serialized],
        )?;

        Ok(())
    }

    fn clear_projects(&self) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM kv_cache WHERE key = ?1;",
            [PROJECT_LIST_CACHE_KEY],
        )?;
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'kv_cache';",
        [],
        |row| row.get(0),
    )?;
    if table_count == 0 {
        return Err(RepoError::MissingRequiredTable("kv_cache"));
    }

    Ok(())
}
