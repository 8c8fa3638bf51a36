//! Remote Layer
//!
//! Network-facing collaborators of the repository: the breed catalog client
//! and the reachability check that gates it.

mod client;
mod connectivity;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Breed;

pub use client::CatApiClient;
pub use connectivity::TcpProbe;

/// Fetches the full breed catalog
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Breed>, RemoteError>;
}

/// Reports current network reachability
#[async_trait]
pub trait ConnectivityOracle: Send + Sync {
    async fn is_connected(&self) -> bool;
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Catalog service answered with status {0}")]
    Status(u16),
    #[error("Malformed catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}
