//! SQLite persistence for conversations and settings

mod migrations;
mod queries;

pub use migrations::run_migrations;
pub use queries::*;

use crate::error::Result;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;
use tracing::info;

const DB_FILE: &str = "colloquy.db";
const FILE_POOL_SIZE: u32 = 10;

/// Pooled SQLite database with migrations applied
pub struct Storage {
    pool: Pool<SqliteConnectionManager>,
}

impl Storage {
    /// Open (or create) the database file inside `data_dir`
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join(DB_FILE);
        info!("Opening conversation database at {:?}", db_path);
        Self::with_manager(SqliteConnectionManager::file(db_path), FILE_POOL_SIZE)
    }

    /// Private database that lives as long as this value
    pub fn in_memory() -> Result<Self> {
        // Each in-memory connection is a separate database.
        Self::with_manager(SqliteConnectionManager::memory(), 1)
    }

    fn with_manager(manager: SqliteConnectionManager, max_size: u32) -> Result<Self> {
        let pool = Pool::builder().max_size(max_size).build(manager)?;
        run_migrations(&*pool.get()?)?;
        Ok(Self { pool })
    }

    pub fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_connections_share_one_database() {
        let storage = Storage::in_memory().unwrap();
        set_setting(&storage.connection().unwrap(), "k", "v").unwrap();

        let conn = storage.connection().unwrap();
        assert_eq!(get_setting(&conn, "k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_file_storage_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();

        {
            let storage = Storage::open(dir.path()).unwrap();
            let conn = storage.connection().unwrap();
            set_setting(&conn, "k", "v").unwrap();
        }

        let storage = Storage::open(dir.path()).unwrap();
        let conn = storage.connection().unwrap();
        assert_eq!(get_setting(&conn, "k").unwrap().as_deref(), Some("v"));
        assert!(dir.path().join(DB_FILE).exists());
    }
}
