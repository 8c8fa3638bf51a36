//! Favorite Marker Entity
//!
//! Presence of a marker means the breed is a favorite. No payload.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FavoriteMarker {
    pub breed_id: String,
}

impl FavoriteMarker {
    pub fn new(breed_id: impl Into<String>) -> Self {
        Self {
            breed_id: breed_id.into(),
        }
    }
}

impl Entity for FavoriteMarker {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.breed_id.clone()
    }
}
