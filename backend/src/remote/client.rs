//! Breed Catalog HTTP Client
//!
//! `GET {base}/breeds`, authenticated with `x-api-key` when a key is set.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::config::AppConfig;
use crate::domain::Breed;
use super::{RemoteCatalog, RemoteError};

const API_KEY_HEADER: &str = "x-api-key";

pub struct CatApiClient {
    base_url: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

/// Catalog wire record
#[derive(Debug, Deserialize)]
struct BreedDto {
    id: String,
    name: String,
    #[serde(default)]
    origin: Option<String>,
    #[serde(default)]
    description: Option<String>,
    /// Comma separated, e.g. "Active, Energetic, Gentle"
    #[serde(default)]
    temperament: Option<String>,
    #[serde(default)]
    life_span: Option<String>,
    #[serde(default)]
    reference_image_id: Option<String>,
}

impl From<BreedDto> for Breed {
    fn from(dto: BreedDto) -> Self {
        let temperament = dto
            .temperament
            .unwrap_or_default()
            .split(',')
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();

        Breed {
            id: dto.id,
            name: dto.name,
            origin: dto.origin.unwrap_or_default(),
            description: dto.description.unwrap_or_default(),
            temperament,
            life_span: dto.life_span.unwrap_or_default(),
            image_reference: dto.reference_image_id.filter(|r| !r.is_empty()),
            is_favorite: false,
        }
    }
}

impl CatApiClient {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http_client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, RemoteError> {
        Self::new(
            &config.api_base_url,
            config.api_key.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn breeds_url(&self) -> String {
        format!("{}/breeds", self.base_url)
    }
}

#[async_trait]
impl RemoteCatalog for CatApiClient {
    async fn fetch_all(&self) -> Result<Vec<Breed>, RemoteError> {
        let mut request = self.http_client.get(self.breeds_url());
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_breeds(&body)
    }
}

fn parse_breeds(body: &str) -> Result<Vec<Breed>, RemoteError> {
    let dtos: Vec<BreedDto> = serde_json::from_str(body)?;
    Ok(dtos.into_iter().map(Breed::from).collect())
}
