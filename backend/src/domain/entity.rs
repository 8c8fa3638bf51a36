//! Domain Layer - Core Entity Trait and Errors
//!
//! This trait defines the basic contract for all persisted domain entities.

use std::error::Error as StdError;
use thiserror::Error;

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Clone + Eq + std::hash::Hash + Send + Sync;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Refresh attempted while the network is unreachable; nothing was tried
    #[error("No network connection")]
    NoConnectivity,
    /// Network or storage fault during a catalog refresh
    #[error("Catalog refresh failed: {0}")]
    RefreshFailed(#[source] Box<dyn StdError + Send + Sync>),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn storage(e: impl std::fmt::Display) -> Self {
        DomainError::Storage(e.to_string())
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}
