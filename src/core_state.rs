//! Shared application state.
//!
//! `CoreState` is wrapped in `Arc` at startup and handed to the HTTP layer.
//! It only knows where the database lives. Every request opens its own
//! connection and runs its reads inside one read transaction, so a report
//! never mixes store states with an import committing alongside it.

use std::path::{Path, PathBuf};

use crate::config;
use crate::db;

pub struct CoreState {
    db_path: PathBuf,
}

impl CoreState {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// State pointing at the configured database location.
    pub fn from_env() -> Self {
        Self::new(config::database_path())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a fresh connection to the record store.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }

    /// Run `read` inside a deferred read transaction on a fresh connection.
    /// Every query `read` issues sees the store as of its first read.
    pub fn read_snapshot<T, F>(&self, read: F) -> Result<T, CoreError>
    where
        F: FnOnce(&rusqlite::Connection) -> Result<T, db::DatabaseError>,
    {
        let conn = self.open_db()?;
        let tx = conn.unchecked_transaction().map_err(db::DatabaseError::from)?;
        let value = read(&tx)?;
        tx.commit().map_err(db::DatabaseError::from)?;
        Ok(value)
    }

    /// Open the store once so pending migrations run before serving.
    pub fn migrate(&self) -> Result<(), CoreError> {
        self.open_db().map(|_| ())
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
}
