//! Cat Breeds Backend
//!
//! Layered architecture:
//! - domain: Core entities and errors
//! - repository: Local stores, live projections, the breed repository
//! - remote: Catalog HTTP client and connectivity probe
//! - config / images: App configuration and local image storage

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod images;
pub mod remote;
pub mod repository;

use config::AppConfig;
use domain::{DomainError, DomainResult};
use images::LocalImageStore;
use remote::{CatApiClient, TcpProbe};
use repository::{init_db, BreedRepository, DbState, SqliteCatalogStore, SqliteFavoriteStore};

pub const DB_FILE_NAME: &str = "cat_breeds.db";
pub const IMAGES_DIR_NAME: &str = "breed_images";
pub const LOG_DIR_NAME: &str = "logs";

/// Everything the front end needs, wired once at startup
pub struct AppState {
    pub repository: BreedRepository,
    pub images: Arc<LocalImageStore>,
    pub config: AppConfig,
    pub db_state: DbState,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load config, open the database and build the repository
    pub async fn open(data_dir: &Path) -> DomainResult<Self> {
        let config = config::load_config(data_dir);
        let db_state = init_db(&data_dir.join(DB_FILE_NAME)).await?;

        let remote = CatApiClient::from_config(&config)
            .map_err(|e| DomainError::InvalidInput(format!("HTTP client: {}", e)))?;
        let connectivity = TcpProbe::for_url(&config.api_base_url).ok_or_else(|| {
            DomainError::InvalidInput(format!("Bad api_base_url: {}", config.api_base_url))
        })?;

        let repository = BreedRepository::new(
            Arc::new(SqliteCatalogStore::new(db_state.connection())),
            Arc::new(SqliteFavoriteStore::new(db_state.connection())),
            Arc::new(remote),
            Arc::new(connectivity),
        )
        .with_similar_limit(config.similar_limit);

        log::info!("App state ready in {}", data_dir.display());

        Ok(Self {
            repository,
            images: Arc::new(LocalImageStore::new(data_dir.join(IMAGES_DIR_NAME))),
            config,
            db_state,
            data_dir: data_dir.to_path_buf(),
        })
    }
}

/// Where log files for `data_dir` live; usable before `AppState::open`
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::open(dir.path()).await.expect("open");

        assert!(dir.path().join(DB_FILE_NAME).exists());
        assert_eq!(state.db_state.path(), dir.path().join(DB_FILE_NAME));
        assert!(state.repository.get_breed_by_id("abys").await.unwrap().is_none());
    }

    #[test]
    fn test_log_dir_sits_in_data_dir() {
        assert_eq!(log_dir(Path::new("/data/cats")), PathBuf::from("/data/cats/logs"));
    }

    #[tokio::test]
    async fn test_open_rejects_bad_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            api_base_url: "catalog".to_string(),
            ..AppConfig::default()
        };
        config::save_config(dir.path(), &config).unwrap();

        assert!(matches!(
            AppState::open(dir.path()).await,
            Err(DomainError::InvalidInput(_))
        ));
    }
}
