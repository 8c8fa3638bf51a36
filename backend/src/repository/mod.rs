//! Repository Layer
//!
//! Local stores, live projections and the breed repository that mediates
//! between them and the remote catalog.

mod traits;
mod db;
mod catalog_store;
mod favorite_store;
mod live;
mod similarity;
mod breed_repo;


pub use traits::Repository;
pub use db::{init_db, DbState, SharedConnection};
pub use catalog_store::SqliteCatalogStore;
pub use favorite_store::SqliteFavoriteStore;
pub use live::Live;
pub use similarity::similar_breeds;
pub use breed_repo::{BreedRepository, CatalogStore, FavoriteStore, DEFAULT_SIMILAR_LIMIT};
