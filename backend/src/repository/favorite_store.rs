//! Favorite Marker Store
//!
//! SQLite-backed set of favorite breed ids. Inserting an existing marker and
//! deleting a missing one are both no-ops.

use async_trait::async_trait;
use rusqlite::params;
use tokio::sync::watch;

use crate::domain::{DomainResult, FavoriteMarker};
use super::db::SharedConnection;
use super::traits::Repository;

pub struct SqliteFavoriteStore {
    conn: SharedConnection,
    version: watch::Sender<u64>,
}

impl SqliteFavoriteStore {
    pub fn new(conn: SharedConnection) -> Self {
        let (version, _) = watch::channel(0);
        Self { conn, version }
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

#[async_trait]
impl Repository<FavoriteMarker> for SqliteFavoriteStore {
    async fn find_by_id(&self, id: &String) -> DomainResult<Option<FavoriteMarker>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare("SELECT breed_id FROM favorites WHERE breed_id = ?")?;
        let mut rows = stmt.query(params![id])?;

        match rows.next()? {
            Some(row) => Ok(Some(FavoriteMarker::new(row.get::<_, String>(0)?))),
            None => Ok(None),
        }
    }

    async fn list(&self) -> DomainResult<Vec<FavoriteMarker>> {
        let conn = self.conn.lock().await;

        let mut stmt = conn.prepare("SELECT breed_id FROM favorites ORDER BY created_at, breed_id")?;
        let mut rows = stmt.query([])?;

        let mut markers = Vec::new();
        while let Some(row) = rows.next()? {
            markers.push(FavoriteMarker::new(row.get::<_, String>(0)?));
        }
        Ok(markers)
    }

    async fn upsert(&self, entity: &FavoriteMarker) -> DomainResult<()> {
        {
            let conn = self.conn.lock().await;
            conn.execute(
                "INSERT OR IGNORE INTO favorites (breed_id, created_at) VALUES (?, ?)",
                params![entity.breed_id, chrono::Utc::now().timestamp_millis()],
            )?;
        }
        self.bump();
        Ok(())
    }

    async fn delete(&self, id: &String) -> DomainResult<()> {
        {
            let conn = self.conn.lock().await;
            conn.execute("DELETE FROM favorites WHERE breed_id = ?", params![id])?;
        }
        self.bump();
        Ok(())
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}
