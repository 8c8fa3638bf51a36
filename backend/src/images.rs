//! Local Image Storage
//!
//! Images picked for user-created breeds are copied into the app's image
//! directory so the breed keeps working when the original file goes away.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, DomainResult};

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Copy `source` into app storage and return the stored path
    async fn persist(&self, source: &Path) -> DomainResult<String>;
}

/// True when the file extension maps to an `image/*` type
pub fn is_image_path(path: &Path) -> bool {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.type_() == mime_guess::mime::IMAGE)
        .unwrap_or(false)
}

pub struct LocalImageStore {
    dir: PathBuf,
}

impl LocalImageStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<millis>.<ext>`, suffixed when that name is taken
    fn target_path(&self, extension: &str) -> PathBuf {
        let stamp = chrono::Utc::now().timestamp_millis();
        let mut path = self.dir.join(format!("{}.{}", stamp, extension));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{}_{}.{}", stamp, n, extension));
            n += 1;
        }
        path
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn persist(&self, source: &Path) -> DomainResult<String> {
        if !is_image_path(source) {
            return Err(DomainError::InvalidInput(format!(
                "{} is not an image",
                source.display()
            )));
        }
        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_else(|| "img".to_string());

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DomainError::Storage(format!("Failed to create images directory: {}", e)))?;

        let target = self.target_path(&extension);
        tokio::fs::copy(source, &target)
            .await
            .map_err(|e| DomainError::Storage(format!("Failed to copy image: {}", e)))?;

        log::info!("Stored image {}", target.display());
        Ok(target.to_string_lossy().to_string())
    }
}
