//! Breed Entity
//!
//! A catalog breed (fetched from the remote catalog) or a user-created one.
//! `is_favorite` is derived from the favorite markers at read time and is
//! never written to the breeds table.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// Prefix that marks locally created breeds. Remote ids never carry it,
/// so a catalog refresh cannot overwrite a user breed.
pub const USER_BREED_PREFIX: &str = "user_";

/// Image shown when a breed has no reference of its own
pub const DEFAULT_IMAGE_REFERENCE: &str = "0XYvRd7oD";

const IMAGE_CDN: &str = "https://cdn2.thecatapi.com/images";

/// A cat breed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breed {
    /// Stable unique identifier
    pub id: String,
    pub name: String,
    pub origin: String,
    pub description: String,
    /// Short tags, in catalog order
    pub temperament: Vec<String>,
    /// "min - max" years, kept as text
    pub life_span: String,
    /// Remote image id for catalog breeds, local file path for user breeds
    pub image_reference: Option<String>,
    /// Derived from the favorite store, not persisted
    #[serde(default)]
    pub is_favorite: bool,
}

impl Breed {
    pub fn new(id: impl Into<String>, name: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            origin: origin.into(),
            description: String::new(),
            temperament: Vec::new(),
            life_span: String::new(),
            image_reference: None,
            is_favorite: false,
        }
    }

    pub fn with_temperament<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.temperament = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_life_span(mut self, life_span: impl Into<String>) -> Self {
        self.life_span = life_span.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_image(mut self, reference: impl Into<String>) -> Self {
        self.image_reference = Some(reference.into());
        self
    }

    /// Copy of this breed with the favorite flag set
    pub fn annotated(&self, is_favorite: bool) -> Self {
        Self {
            is_favorite,
            ..self.clone()
        }
    }

    pub fn is_user_created(&self) -> bool {
        is_user_breed_id(&self.id)
    }

    pub fn image_reference_or_default(&self) -> &str {
        self.image_reference
            .as_deref()
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_IMAGE_REFERENCE)
    }

    /// Where the image can be loaded from: a CDN URL or a local path
    pub fn image_url(&self) -> String {
        let reference = self.image_reference_or_default();
        if self.is_user_created() && self.image_reference.is_some() {
            reference.to_string()
        } else {
            format!("{}/{}.jpg", IMAGE_CDN, reference)
        }
    }

    /// Parse "min - max" into numbers. Display helper only.
    pub fn life_span_bounds(&self) -> Option<(u32, u32)> {
        let (min, max) = self.life_span.split_once('-')?;
        let min = min.trim().parse().ok()?;
        let max = max.trim().parse().ok()?;
        Some((min, max))
    }
}

impl Entity for Breed {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

pub fn is_user_breed_id(id: &str) -> bool {
    id.starts_with(USER_BREED_PREFIX)
}

/// Fresh id for a user-created breed: `user_` + 16 hex chars
pub fn new_user_breed_id(name: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(name.as_bytes());
    hasher.update(&chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
    let hex = hasher.finalize().to_hex();
    format!("{}{}", USER_BREED_PREFIX, &hex.as_str()[..16])
}
