//! State Store
//!
//! Published view state: one writer (the holder's task), any number of
//! readers. Readers always see the latest value; intermediate values may be
//! skipped.

use std::sync::Arc;
use tokio::sync::watch;

pub struct StateStore<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for StateStore<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T: Clone> StateStore<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current state
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Mutate in place and notify readers
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }
}
