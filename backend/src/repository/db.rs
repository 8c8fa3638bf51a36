//! Database Connection and Setup
//!
//! Manages the SQLite connection and schema migrations.

use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Connection shared by every store
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Database state wrapper
#[derive(Clone)]
pub struct DbState {
    conn: SharedConnection,
    path: PathBuf,
}

impl DbState {
    pub fn connection(&self) -> SharedConnection {
        self.conn.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Open the database at `db_path` (or in memory for `:memory:`) and migrate it
pub async fn init_db(db_path: &Path) -> DomainResult<DbState> {
    let conn = if db_path == Path::new(":memory:") {
        Connection::open_in_memory()
    } else {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DomainError::Storage(format!("Failed to create {}: {}", parent.display(), e)))?;
        }
        Connection::open(db_path)
    }
    .map_err(|e| DomainError::Storage(format!("Failed to open db: {}", e)))?;

    run_migrations(&conn)?;
    log::info!("Database ready at {}", db_path.display());

    Ok(DbState {
        conn: Arc::new(Mutex::new(conn)),
        path: db_path.to_path_buf(),
    })
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS breeds (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            origin TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            temperament TEXT NOT NULL DEFAULT '[]',
            life_span TEXT NOT NULL DEFAULT ''
        )",
        [],
    )?;

    // Added after the first schema: image reference and write timestamp
    if !column_exists(conn, "breeds", "image_reference")? {
        conn.execute("ALTER TABLE breeds ADD COLUMN image_reference TEXT", [])
            .map_err(|e| DomainError::Storage(format!("Failed to add image_reference: {}", e)))?;
    }

    if !column_exists(conn, "breeds", "updated_at")? {
        conn.execute("ALTER TABLE breeds ADD COLUMN updated_at INTEGER NOT NULL DEFAULT 0", [])
            .map_err(|e| DomainError::Storage(format!("Failed to add updated_at: {}", e)))?;
    }

    conn.execute(
        "CREATE TABLE IF NOT EXISTS favorites (
            breed_id TEXT PRIMARY KEY NOT NULL,
            created_at INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_breeds_name ON breeds(name)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cats.db");

        let first = init_db(&path).await.expect("first open");
        drop(first);
        let second = init_db(&path).await.expect("second open");

        let conn = second.connection();
        let conn = conn.lock().await;
        assert!(column_exists(&conn, "breeds", "image_reference").unwrap());
        assert!(column_exists(&conn, "favorites", "breed_id").unwrap());
        assert!(!column_exists(&conn, "breeds", "is_favorite").unwrap());
    }
}
