//! Breed Detail Holder
//!
//! One breed, its favorite flag (kept in sync with the favorite store) and
//! its similar breeds. Supports favorite toggling and deleting user breeds.

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use cat_breeds_lib::domain::{Breed, DomainError};
use cat_breeds_lib::repository::BreedRepository;

use crate::messages::{user_message, GENERIC_ERROR_MESSAGE};
use crate::store::StateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailPhase {
    #[default]
    Loading,
    Ready,
    /// No breed with that id (or the lookup failed)
    Missing,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreedDetailState {
    pub phase: DetailPhase,
    pub breed: Option<Breed>,
    pub is_favorite: bool,
    pub similar_breeds: Vec<Breed>,
    pub error_message: Option<String>,
    /// Set once the breed was deleted; the UI navigates away
    pub deleted: bool,
}

impl BreedDetailState {
    pub fn can_delete(&self) -> bool {
        !self.deleted && self.breed.as_ref().is_some_and(Breed::is_user_created)
    }
}

enum Intent {
    ToggleFavorite,
    Delete,
    ErrorShown,
}

pub struct BreedDetail {
    store: StateStore<BreedDetailState>,
    intents: mpsc::UnboundedSender<Intent>,
    task: JoinHandle<()>,
}

impl BreedDetail {
    /// Must be called inside a tokio runtime
    pub fn open(repo: BreedRepository, id: impl Into<String>) -> Self {
        let store = StateStore::new(BreedDetailState::default());
        let (intents, rx) = mpsc::unbounded_channel();

        let worker = DetailWorker {
            repo,
            id: id.into(),
            store: store.clone(),
        };
        let task = tokio::spawn(worker.run(rx));

        Self { store, intents, task }
    }

    pub fn state(&self) -> BreedDetailState {
        self.store.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<BreedDetailState> {
        self.store.subscribe()
    }

    pub fn toggle_favorite(&self) {
        self.send(Intent::ToggleFavorite);
    }

    pub fn delete(&self) {
        self.send(Intent::Delete);
    }

    pub fn error_shown(&self) {
        self.send(Intent::ErrorShown);
    }

    fn send(&self, intent: Intent) {
        if self.intents.send(intent).is_err() {
            log::warn!("Breed detail task has stopped; intent dropped");
        }
    }
}

impl Drop for BreedDetail {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct DetailWorker {
    repo: BreedRepository,
    id: String,
    store: StateStore<BreedDetailState>,
}

impl DetailWorker {
    async fn run(self, mut intents: mpsc::UnboundedReceiver<Intent>) {
        let found = self.load().await;

        let mut favorites_live = self.repo.observe_favorite_breeds();
        let mut similar_live = self.repo.observe_similar_breeds(&self.id);
        let (mut favorites_open, mut similar_open) = (found, found);

        loop {
            tokio::select! {
                // Store changes before intents
                biased;

                open = favorites_live.changed(), if favorites_open => {
                    if !open {
                        favorites_open = false;
                        continue;
                    }
                    match favorites_live.current().await {
                        Ok(favorites) => {
                            let is_favorite = favorites.iter().any(|b| b.id == self.id);
                            self.store.update(|s| s.is_favorite = is_favorite);
                        }
                        Err(e) => log::error!("Loading favorites failed: {}", e),
                    }
                }
                open = similar_live.changed(), if similar_open => {
                    if !open {
                        similar_open = false;
                        continue;
                    }
                    match similar_live.current().await {
                        Ok(similar) => self.store.update(|s| s.similar_breeds = similar),
                        Err(e) => log::error!("Loading similar breeds for {} failed: {}", self.id, e),
                    }
                }
                intent = intents.recv() => match intent {
                    None => break,
                    Some(Intent::ToggleFavorite) => self.toggle_favorite().await,
                    Some(Intent::Delete) => self.delete().await,
                    Some(Intent::ErrorShown) => self.store.update(|s| s.error_message = None),
                },
            }
        }
    }

    /// Returns whether the breed exists
    async fn load(&self) -> bool {
        match self.repo.get_breed_by_id(&self.id).await {
            Ok(Some(breed)) => {
                self.store.update(|s| {
                    s.phase = DetailPhase::Ready;
                    s.is_favorite = breed.is_favorite;
                    s.breed = Some(breed);
                });
                true
            }
            Ok(None) => {
                log::warn!("Breed {} not found", self.id);
                self.fail_load(GENERIC_ERROR_MESSAGE);
                false
            }
            Err(e) => {
                log::error!("Loading breed {} failed: {}", self.id, e);
                self.fail_load(user_message(&e));
                false
            }
        }
    }

    fn fail_load(&self, message: &str) {
        self.store.update(|s| {
            s.phase = DetailPhase::Missing;
            s.error_message = Some(message.to_string());
        });
    }

    async fn toggle_favorite(&self) {
        let state = self.store.get();
        if state.phase != DetailPhase::Ready || state.deleted {
            return;
        }
        let was_favorite = state.is_favorite;
        self.store.update(|s| s.is_favorite = !was_favorite);

        let result = if was_favorite {
            self.repo.remove_breed_from_favorites(&self.id).await
        } else {
            self.repo.add_breed_to_favorites(&self.id).await
        };

        if let Err(e) = result {
            log::error!("Favorite toggle for {} failed: {}", self.id, e);
            self.report(&e, |s| s.is_favorite = was_favorite);
        }
    }

    async fn delete(&self) {
        if !self.store.get().can_delete() {
            log::warn!("Refusing to delete breed {}", self.id);
            self.store
                .update(|s| s.error_message = Some(GENERIC_ERROR_MESSAGE.to_string()));
            return;
        }

        match self.repo.delete_breed(&self.id).await {
            Ok(()) => self.store.update(|s| {
                s.deleted = true;
                s.is_favorite = false;
            }),
            Err(e) => {
                log::error!("Deleting breed {} failed: {}", self.id, e);
                self.report(&e, |_| {});
            }
        }
    }

    fn report(&self, e: &DomainError, rollback: impl FnOnce(&mut BreedDetailState)) {
        let message = user_message(e).to_string();
        self.store.update(|s| {
            rollback(s);
            s.error_message = Some(message);
        });
    }
}
