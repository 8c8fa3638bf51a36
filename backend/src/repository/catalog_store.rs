//! Breed Catalog Store
//!
//! SQLite-backed cache of breed rows keyed by id. Rows never carry the
//! favorite flag; breeds read back always have `is_favorite = false`.

use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use tokio::sync::watch;

use crate::domain::{Breed, DomainError, DomainResult};
use super::db::SharedConnection;
use super::traits::Repository;

const BREED_COLUMNS: &str =
    "id, name, origin, description, temperament, life_span, image_reference";

const UPSERT_BREED: &str = "INSERT OR REPLACE INTO breeds
    (id, name, origin, description, temperament, life_span, image_reference, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)";

/// SQLite implementation of the catalog store
pub struct SqliteCatalogStore {
    conn: SharedConnection,
    version: watch::Sender<u64>,
}

impl SqliteCatalogStore {
    pub fn new(conn: SharedConnection) -> Self {
        let (version, _) = watch::channel(0);
        Self { conn, version }
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

#[async_trait]
impl Repository<Breed> for SqliteCatalogStore {
    async fn find_by_id(&self, id: &String) -> DomainResult<Option<Breed>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM breeds WHERE id = ?", BREED_COLUMNS))?;
        let mut rows = stmt.query(params![id])?;

        match rows.next()? {
            Some(row) => Ok(Some(row_to_breed(row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> DomainResult<Vec<Breed>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare(&format!("SELECT {} FROM breeds ORDER BY name, id", BREED_COLUMNS))?;
        let mut rows = stmt.query([])?;

        let mut breeds = Vec::new();
        while let Some(row) = rows.next()? {
            breeds.push(row_to_breed(row)?);
        }
        Ok(breeds)
    }

    async fn upsert(&self, entity: &Breed) -> DomainResult<()> {
        {
            let conn = self.conn.lock().await;
            write_breed(&conn, entity)?;
        }
        self.bump();
        Ok(())
    }

    async fn upsert_all(&self, entities: &[Breed]) -> DomainResult<()> {
        {
            let mut conn = self.conn.lock().await;
            let tx = conn.transaction()?;
            for breed in entities {
                write_breed(&tx, breed)?;
            }
            tx.commit()?;
        }
        self.bump();
        Ok(())
    }

    async fn delete(&self, id: &String) -> DomainResult<()> {
        {
            let conn = self.conn.lock().await;
            conn.execute("DELETE FROM breeds WHERE id = ?", params![id])?;
        }
        self.bump();
        Ok(())
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}

fn write_breed(conn: &Connection, breed: &Breed) -> DomainResult<()> {
    let temperament = serde_json::to_string(&breed.temperament).map_err(DomainError::storage)?;
    conn.execute(
        UPSERT_BREED,
        params![
            breed.id,
            breed.name,
            breed.origin,
            breed.description,
            temperament,
            breed.life_span,
            breed.image_reference,
            chrono::Utc::now().timestamp_millis(),
        ],
    )?;
    Ok(())
}

/// Convert a database row to Breed
fn row_to_breed(row: &Row) -> DomainResult<Breed> {
    let temperament: String = row.get(4)?;
    Ok(Breed {
        id: row.get(0)?,
        name: row.get(1)?,
        origin: row.get(2)?,
        description: row.get(3)?,
        temperament: serde_json::from_str(&temperament).map_err(|e| {
            DomainError::Storage(format!("Corrupt temperament column: {}", e))
        })?,
        life_span: row.get(5)?,
        image_reference: row.get(6)?,
        is_favorite: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::db::init_db;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_corrupt_temperament_is_a_storage_error() {
        let db_state = init_db(&PathBuf::from(":memory:")).await.unwrap();
        let store = SqliteCatalogStore::new(db_state.connection());
        store
            .upsert(&Breed::new("abys", "Abyssinian", "Egypt").with_temperament(["Active"]))
            .await
            .unwrap();

        {
            let conn = db_state.connection();
            let conn = conn.lock().await;
            conn.execute("UPDATE breeds SET temperament = 'Active, Gentle' WHERE id = 'abys'", [])
                .unwrap();
        }

        let err = store.find_by_id(&"abys".to_string()).await.unwrap_err();
        assert!(matches!(err, DomainError::Storage(msg) if msg.contains("temperament")));
        assert!(store.list().await.is_err());
    }

    #[tokio::test]
    async fn test_failed_bulk_write_leaves_no_rows() {
        let db_state = init_db(&PathBuf::from(":memory:")).await.unwrap();
        let store = SqliteCatalogStore::new(db_state.connection());
        {
            let conn = db_state.connection();
            let conn = conn.lock().await;
            conn.execute(
                "CREATE TRIGGER reject_bad BEFORE INSERT ON breeds WHEN NEW.id = 'bad'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END",
                [],
            )
            .unwrap();
        }

        let batch = vec![
            Breed::new("abys", "Abyssinian", "Egypt"),
            Breed::new("bad", "Broken", "Nowhere"),
        ];
        assert!(store.upsert_all(&batch).await.is_err());
        assert!(store.list().await.unwrap().is_empty());
        assert_eq!(*store.changes().borrow(), 0);
    }
}
