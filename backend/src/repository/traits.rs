//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for local data access.
//! Implementations can use SQLite, in-memory, etc.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{Entity, DomainResult};

/// Core store trait for keyed entities
///
/// Generic over any Entity type. Every write bumps the version published
/// on `changes()`, which is what live sequences wait on.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: &T::Id) -> DomainResult<Option<T>>;

    /// List all entities
    async fn list(&self) -> DomainResult<Vec<T>>;

    /// Insert, replacing any row with the same ID
    async fn upsert(&self, entity: &T) -> DomainResult<()>;

    /// Bulk insert-or-replace
    async fn upsert_all(&self, entities: &[T]) -> DomainResult<()> {
        for entity in entities {
            self.upsert(entity).await?;
        }
        Ok(())
    }

    /// Delete entity by ID. Missing IDs are not an error.
    async fn delete(&self, id: &T::Id) -> DomainResult<()>;

    /// Version counter, incremented after every write
    fn changes(&self) -> watch::Receiver<u64>;

    async fn exists(&self, id: &T::Id) -> DomainResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
