//! Breed List Holder
//!
//! Combines the all-breeds stream, the favorite-breeds stream and the search
//! text into one published `BreedListState`. All mutations happen on the
//! holder's own task, in the order events arrive.

use std::collections::HashSet;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use cat_breeds_lib::domain::{Breed, DomainResult};
use cat_breeds_lib::repository::BreedRepository;

use super::filter::{annotate, favorite_ids, filter_breeds};
use super::{poll_slot, BoxFuture, Phase};
use crate::messages::user_message;
use crate::store::StateStore;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreedListState {
    pub phase: Phase,
    /// Every breed, favorite-annotated
    pub breeds: Vec<Breed>,
    /// `breeds` narrowed by `search_text`
    pub filtered_breeds: Vec<Breed>,
    pub search_text: String,
    /// Shown once, then cleared through `error_shown()`
    pub error_message: Option<String>,
}

enum Intent {
    Search(String),
    ToggleFavorite(String),
    ErrorShown,
    RetryRefresh,
}

pub struct BreedList {
    store: StateStore<BreedListState>,
    intents: mpsc::UnboundedSender<Intent>,
    task: JoinHandle<()>,
}

impl BreedList {
    /// Subscribe to the repository and kick off the initial refresh.
    /// Must be called inside a tokio runtime.
    pub fn start(repo: BreedRepository) -> Self {
        let store = StateStore::new(BreedListState::default());
        let (intents, rx) = mpsc::unbounded_channel();

        let worker = ListWorker {
            repo,
            store: store.clone(),
            all_breeds: Vec::new(),
            favorites: HashSet::new(),
            search_text: String::new(),
        };
        let task = tokio::spawn(worker.run(rx));

        Self { store, intents, task }
    }

    pub fn state(&self) -> BreedListState {
        self.store.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<BreedListState> {
        self.store.subscribe()
    }

    pub fn set_search_text(&self, text: impl Into<String>) {
        self.send(Intent::Search(text.into()));
    }

    /// Flip the favorite state of `id`; the list reflects it immediately
    pub fn toggle_favorite(&self, id: impl Into<String>) {
        self.send(Intent::ToggleFavorite(id.into()));
    }

    /// The UI has displayed `error_message`
    pub fn error_shown(&self) {
        self.send(Intent::ErrorShown);
    }

    /// Run the catalog refresh again (user pulled to refresh)
    pub fn retry_refresh(&self) {
        self.send(Intent::RetryRefresh);
    }

    fn send(&self, intent: Intent) {
        if self.intents.send(intent).is_err() {
            log::warn!("Breed list task has stopped; intent dropped");
        }
    }
}

impl Drop for BreedList {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct ListWorker {
    repo: BreedRepository,
    store: StateStore<BreedListState>,
    all_breeds: Vec<Breed>,
    favorites: HashSet<String>,
    search_text: String,
}

impl ListWorker {
    async fn run(mut self, mut intents: mpsc::UnboundedReceiver<Intent>) {
        self.store.update(|s| s.phase = Phase::Loading);
        let mut all_live = self.repo.observe_all_breeds();
        let mut favorites_live = self.repo.observe_favorite_breeds();
        let (mut all_open, mut favorites_open) = (true, true);
        let mut refresh = Some(self.refresh_future());

        loop {
            tokio::select! {
                // Store changes before refresh completion and intents
                biased;

                open = all_live.changed(), if all_open => {
                    if !open {
                        all_open = false;
                        continue;
                    }
                    match all_live.current().await {
                        Ok(breeds) => {
                            self.all_breeds = breeds;
                            self.publish();
                        }
                        Err(e) => log::error!("Loading breeds failed: {}", e),
                    }
                }
                open = favorites_live.changed(), if favorites_open => {
                    if !open {
                        favorites_open = false;
                        continue;
                    }
                    match favorites_live.current().await {
                        Ok(favorites) => {
                            self.favorites = favorite_ids(&favorites);
                            self.publish();
                        }
                        Err(e) => log::error!("Loading favorites failed: {}", e),
                    }
                }
                result = poll_slot(&mut refresh), if refresh.is_some() => {
                    refresh = None;
                    self.on_refresh_done(result);
                }
                intent = intents.recv() => match intent {
                    None => break,
                    Some(Intent::Search(text)) => {
                        self.search_text = text;
                        self.publish();
                    }
                    Some(Intent::ToggleFavorite(id)) => self.toggle_favorite(id).await,
                    Some(Intent::ErrorShown) => self.store.update(|s| s.error_message = None),
                    Some(Intent::RetryRefresh) => {
                        if refresh.is_none() {
                            refresh = Some(self.refresh_future());
                            self.store.update(|s| s.phase = Phase::Loading);
                        }
                    }
                },
            }
        }
    }

    fn refresh_future(&self) -> BoxFuture<DomainResult<()>> {
        let repo = self.repo.clone();
        Box::pin(async move { repo.refresh_from_remote().await })
    }

    fn on_refresh_done(&self, result: DomainResult<()>) {
        match result {
            Ok(()) => self.store.update(|s| s.phase = Phase::Ready),
            Err(e) => {
                log::error!("Initial catalog refresh failed: {}", e);
                self.store.update(|s| {
                    s.phase = Phase::Ready;
                    s.error_message = Some(user_message(&e).to_string());
                });
            }
        }
    }

    /// Optimistic: publish first, write second, roll back on failure
    async fn toggle_favorite(&mut self, id: String) {
        let was_favorite = self.set_favorite(&id, None);
        self.publish();

        let result = if was_favorite {
            self.repo.remove_breed_from_favorites(&id).await
        } else {
            self.repo.add_breed_to_favorites(&id).await
        };

        if let Err(e) = result {
            log::error!("Favorite toggle for {} failed: {}", id, e);
            self.set_favorite(&id, Some(was_favorite));
            self.publish();
            self.store
                .update(|s| s.error_message = Some(user_message(&e).to_string()));
        }
    }

    /// Set (or flip, when `value` is None) membership; returns the old value
    fn set_favorite(&mut self, id: &str, value: Option<bool>) -> bool {
        let was = self.favorites.contains(id);
        if value.unwrap_or(!was) {
            self.favorites.insert(id.to_string());
        } else {
            self.favorites.remove(id);
        }
        was
    }

    fn publish(&self) {
        let breeds: Vec<Breed> = self
            .all_breeds
            .iter()
            .map(|breed| annotate(breed, &self.favorites))
            .collect();
        let filtered = filter_breeds(&breeds, &self.search_text);
        let search_text = self.search_text.clone();

        self.store.update(|s| {
            s.breeds = breeds;
            s.filtered_breeds = filtered;
            s.search_text = search_text;
        });
    }
}
