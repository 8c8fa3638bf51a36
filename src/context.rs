//! Application Context
//!
//! Shared handles every screen needs, built once at startup and handed to
//! the view-state holders.

use std::path::Path;
use std::sync::Arc;

use cat_breeds_lib::domain::DomainResult;
use cat_breeds_lib::images::ImageStore;
use cat_breeds_lib::repository::BreedRepository;
use cat_breeds_lib::AppState;

use crate::view_state::{BreedDetail, BreedList, NewBreedForm};

#[derive(Clone)]
pub struct AppContext {
    pub repository: BreedRepository,
    pub images: Arc<dyn ImageStore>,
}

impl AppContext {
    pub fn new(repository: BreedRepository, images: Arc<dyn ImageStore>) -> Self {
        Self { repository, images }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.repository.clone(), state.images.clone())
    }

    /// Open the data directory and wire everything
    pub async fn open(data_dir: &Path) -> DomainResult<Self> {
        let state = AppState::open(data_dir).await?;
        Ok(Self::from_state(&state))
    }

    /// Start the list screen; kicks off a catalog refresh
    pub fn breed_list(&self) -> BreedList {
        BreedList::start(self.repository.clone())
    }

    pub fn breed_detail(&self, id: &str) -> BreedDetail {
        BreedDetail::open(self.repository.clone(), id)
    }

    pub fn new_breed_form(&self) -> NewBreedForm {
        NewBreedForm::new(self.repository.clone(), self.images.clone())
    }
}
