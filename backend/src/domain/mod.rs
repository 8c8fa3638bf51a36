//! Domain Layer
//!
//! Contains all domain entities and core abstractions.

mod entity;
mod breed;
mod favorite;

pub use entity::{Entity, DomainError, DomainResult};
pub use breed::{
    Breed, is_user_breed_id, new_user_breed_id, DEFAULT_IMAGE_REFERENCE, USER_BREED_PREFIX,
};
pub use favorite::FavoriteMarker;
