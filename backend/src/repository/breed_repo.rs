//! Breed Repository
//!
//! Stateless mediator between the catalog store, the favorite store, the
//! remote catalog and the connectivity oracle. Every read is recomputed from
//! the stores; nothing is cached here.

use std::sync::Arc;

use crate::domain::{Breed, DomainError, DomainResult, FavoriteMarker};
use crate::remote::{ConnectivityOracle, RemoteCatalog};
use super::live::Live;
use super::similarity::similar_breeds;
use super::traits::Repository;

pub const DEFAULT_SIMILAR_LIMIT: usize = 5;

pub type CatalogStore = Arc<dyn Repository<Breed>>;
pub type FavoriteStore = Arc<dyn Repository<FavoriteMarker>>;

#[derive(Clone)]
pub struct BreedRepository {
    catalog: CatalogStore,
    favorites: FavoriteStore,
    remote: Arc<dyn RemoteCatalog>,
    connectivity: Arc<dyn ConnectivityOracle>,
    similar_limit: usize,
}

impl BreedRepository {
    pub fn new(
        catalog: CatalogStore,
        favorites: FavoriteStore,
        remote: Arc<dyn RemoteCatalog>,
        connectivity: Arc<dyn ConnectivityOracle>,
    ) -> Self {
        Self {
            catalog,
            favorites,
            remote,
            connectivity,
            similar_limit: DEFAULT_SIMILAR_LIMIT,
        }
    }

    pub fn with_similar_limit(mut self, limit: usize) -> Self {
        self.similar_limit = limit;
        self
    }

    /// Every catalog row, `is_favorite = false`. Annotation is the caller's job.
    pub fn observe_all_breeds(&self) -> Live<Vec<Breed>> {
        let catalog = self.catalog.clone();
        Live::new(self.catalog.changes(), move || {
            let catalog = catalog.clone();
            async move { catalog.list().await }
        })
    }

    /// One-shot lookup, annotated with the current favorite state
    pub async fn get_breed_by_id(&self, id: &str) -> DomainResult<Option<Breed>> {
        let id = id.to_string();
        let Some(breed) = self.catalog.find_by_id(&id).await? else {
            return Ok(None);
        };
        let is_favorite = self.favorites.exists(&id).await?;
        Ok(Some(breed.annotated(is_favorite)))
    }

    /// Fetch the whole remote catalog and upsert it into the cache.
    ///
    /// Whether rows written before a failure survive depends on the store's
    /// `upsert_all`; the SQLite store writes all rows or none.
    pub async fn refresh_from_remote(&self) -> DomainResult<()> {
        if !self.connectivity.is_connected().await {
            log::warn!("Catalog refresh skipped: offline");
            return Err(DomainError::NoConnectivity);
        }

        let breeds = self.remote.fetch_all().await.map_err(|e| {
            log::error!("Catalog fetch failed: {}", e);
            DomainError::RefreshFailed(Box::new(e))
        })?;

        self.catalog.upsert_all(&breeds).await.map_err(|e| {
            log::error!("Catalog write failed: {}", e);
            DomainError::RefreshFailed(Box::new(e))
        })?;

        log::info!("Catalog refreshed: {} breeds", breeds.len());
        Ok(())
    }

    pub async fn add_breed_to_favorites(&self, id: &str) -> DomainResult<()> {
        self.favorites.upsert(&FavoriteMarker::new(id)).await
    }

    pub async fn remove_breed_from_favorites(&self, id: &str) -> DomainResult<()> {
        self.favorites.delete(&id.to_string()).await
    }

    /// Favorited breeds, `is_favorite = true`. Markers without a catalog row
    /// are left out. Recomputed on favorite-store changes only.
    pub fn observe_favorite_breeds(&self) -> Live<Vec<Breed>> {
        let catalog = self.catalog.clone();
        let favorites = self.favorites.clone();
        Live::new(self.favorites.changes(), move || {
            let catalog = catalog.clone();
            let favorites = favorites.clone();
            async move {
                let markers = favorites.list().await?;
                let mut breeds = Vec::with_capacity(markers.len());
                for marker in markers {
                    match catalog.find_by_id(&marker.breed_id).await? {
                        Some(breed) => breeds.push(breed.annotated(true)),
                        None => log::debug!("Skipping orphaned favorite {}", marker.breed_id),
                    }
                }
                Ok(breeds)
            }
        })
    }

    /// Catalog breeds related to `id` by origin or temperament, excluding `id`
    pub fn observe_similar_breeds(&self, id: &str) -> Live<Vec<Breed>> {
        let catalog = self.catalog.clone();
        let id = id.to_string();
        let limit = self.similar_limit;
        Live::new(self.catalog.changes(), move || {
            let catalog = catalog.clone();
            let id = id.clone();
            async move {
                let Some(target) = catalog.find_by_id(&id).await? else {
                    return Ok(Vec::new());
                };
                let all = catalog.list().await?;
                Ok(similar_breeds(&target, &all, limit))
            }
        })
    }

    /// Store a user-created breed
    pub async fn add_breed(&self, breed: &Breed) -> DomainResult<()> {
        if !breed.is_user_created() {
            return Err(DomainError::InvalidInput(format!(
                "{} is not a user breed id",
                breed.id
            )));
        }
        if breed.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("Breed name is empty".to_string()));
        }

        self.catalog.upsert(&breed.annotated(false)).await?;
        log::info!("Added user breed {} ({})", breed.id, breed.name);
        Ok(())
    }

    /// Delete a user-created breed and its favorite marker
    pub async fn delete_breed(&self, id: &str) -> DomainResult<()> {
        let id = id.to_string();
        let Some(breed) = self.catalog.find_by_id(&id).await? else {
            return Err(DomainError::NotFound(format!("Breed {}", id)));
        };
        if !breed.is_user_created() {
            return Err(DomainError::InvalidInput(format!(
                "Catalog breed {} cannot be deleted",
                id
            )));
        }

        self.catalog.delete(&id).await?;
        self.favorites.delete(&id).await?;
        log::info!("Deleted user breed {}", id);
        Ok(())
    }
}
