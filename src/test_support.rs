//! Shared fixtures for holder tests: a BreedRepository over in-memory SQLite
//! with a fake remote catalog and connectivity oracle.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::watch;

use cat_breeds_lib::domain::{Breed, DomainError, DomainResult, FavoriteMarker};
use cat_breeds_lib::images::{ImageStore, LocalImageStore};
use cat_breeds_lib::remote::{ConnectivityOracle, RemoteCatalog, RemoteError};
use cat_breeds_lib::repository::{
    init_db, BreedRepository, Repository, SqliteCatalogStore, SqliteFavoriteStore,
};

const WAIT: Duration = Duration::from_secs(2);

pub fn abyssinian() -> Breed {
    Breed::new("abys", "Abyssinian", "Egypt")
        .with_temperament(["Active", "Gentle"])
        .with_life_span("14 - 15")
}

pub fn persian() -> Breed {
    Breed::new("pers", "Persian", "Iran").with_temperament(["Calm"])
}

pub fn siberian() -> Breed {
    Breed::new("sibe", "Siberian", "Russia").with_temperament(["Curious"])
}

struct FakeRemote {
    breeds: Vec<Breed>,
    fail: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl RemoteCatalog for FakeRemote {
    async fn fetch_all(&self) -> Result<Vec<Breed>, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(RemoteError::Status(500))
        } else {
            Ok(self.breeds.clone())
        }
    }
}

struct FakeConnectivity {
    online: AtomicBool,
    /// How long each check takes to answer
    delay: Duration,
}

#[async_trait]
impl ConnectivityOracle for FakeConnectivity {
    async fn is_connected(&self) -> bool {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.online.load(Ordering::SeqCst)
    }
}

/// Favorite store that reads fine but rejects every write
struct ReadOnlyFavorites {
    inner: Arc<SqliteFavoriteStore>,
}

#[async_trait]
impl Repository<FavoriteMarker> for ReadOnlyFavorites {
    async fn find_by_id(&self, id: &String) -> DomainResult<Option<FavoriteMarker>> {
        self.inner.find_by_id(id).await
    }
    async fn list(&self) -> DomainResult<Vec<FavoriteMarker>> {
        self.inner.list().await
    }
    async fn upsert(&self, _entity: &FavoriteMarker) -> DomainResult<()> {
        Err(DomainError::Storage("attempt to write a readonly database".to_string()))
    }
    async fn delete(&self, _id: &String) -> DomainResult<()> {
        Err(DomainError::Storage("attempt to write a readonly database".to_string()))
    }
    fn changes(&self) -> watch::Receiver<u64> {
        self.inner.changes()
    }
}

pub struct Fixture {
    pub repo: BreedRepository,
    remote: Arc<FakeRemote>,
    favorites: Arc<SqliteFavoriteStore>,
    scratch: TempDir,
}

impl Fixture {
    async fn build(
        breeds: Vec<Breed>,
        online: bool,
        fail: bool,
        broken_favorites: bool,
        check_delay: Duration,
    ) -> Self {
        let db_state = init_db(&PathBuf::from(":memory:")).await.expect("Failed to init test DB");
        let catalog = Arc::new(SqliteCatalogStore::new(db_state.connection()));
        let favorites = Arc::new(SqliteFavoriteStore::new(db_state.connection()));
        let remote = Arc::new(FakeRemote {
            breeds,
            fail,
            calls: AtomicUsize::new(0),
        });

        let favorite_store: Arc<dyn Repository<FavoriteMarker>> = if broken_favorites {
            Arc::new(ReadOnlyFavorites { inner: favorites.clone() })
        } else {
            favorites.clone()
        };

        let repo = BreedRepository::new(
            catalog,
            favorite_store,
            remote.clone(),
            Arc::new(FakeConnectivity {
                online: AtomicBool::new(online),
                delay: check_delay,
            }),
        );

        Self {
            repo,
            remote,
            favorites,
            scratch: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Online, remote serves `breeds`, nothing cached yet
    pub async fn new(breeds: Vec<Breed>) -> Self {
        Self::build(breeds, true, false, false, Duration::ZERO).await
    }

    /// Same as `new` with the catalog already refreshed
    pub async fn seeded(breeds: Vec<Breed>) -> Self {
        let fx = Self::new(breeds).await;
        fx.repo.refresh_from_remote().await.expect("seed refresh");
        fx
    }

    pub async fn offline(breeds: Vec<Breed>) -> Self {
        Self::build(breeds, false, false, false, Duration::ZERO).await
    }

    pub async fn failing_remote() -> Self {
        Self::build(Vec::new(), true, true, false, Duration::ZERO).await
    }

    /// Online with a working remote, but favorite writes fail
    pub async fn with_broken_favorites(breeds: Vec<Breed>) -> Self {
        Self::build(breeds, true, false, true, Duration::ZERO).await
    }

    /// Online, but every connectivity check takes `delay` to answer
    pub async fn slow_connectivity(breeds: Vec<Breed>, delay: Duration) -> Self {
        Self::build(breeds, true, false, false, delay).await
    }

    pub fn remote_calls(&self) -> usize {
        self.remote.calls.load(Ordering::SeqCst)
    }

    pub fn images(&self) -> Arc<dyn ImageStore> {
        Arc::new(LocalImageStore::new(self.scratch.path().join("images")))
    }

    /// Write a file into the fixture's temp dir and return its path
    pub fn scratch_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.scratch.path().join(name);
        std::fs::write(&path, contents).expect("write scratch file");
        path
    }

    /// Poll the favorite store until `id` is (or is not) marked
    pub async fn wait_favorite(&self, id: &str, expected: bool) {
        let id = id.to_string();
        tokio::time::timeout(WAIT, async {
            while self.favorites.exists(&id).await.unwrap() != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("favorite {} never became {}", id, expected));
    }
}

/// Wait until the published state satisfies `pred` and return it
pub async fn wait_for<T: Clone>(rx: &mut watch::Receiver<T>, pred: impl Fn(&T) -> bool) -> T {
    tokio::time::timeout(WAIT, rx.wait_for(|state| pred(state)))
        .await
        .expect("timed out waiting for state")
        .expect("state store closed")
        .clone()
}
