//! Live Sequences
//!
//! A `Live<T>` is a restartable subscription to a projection over one store.
//! The first `changed()` resolves immediately so every subscriber starts with
//! the current state; later calls resolve when the store's version moves.
//! Versions coalesce, so a slow consumer only ever sees the latest state.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::DomainResult;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type Fetch<T> = Arc<dyn Fn() -> BoxFuture<DomainResult<T>> + Send + Sync>;

pub struct Live<T> {
    changes: watch::Receiver<u64>,
    fetch: Fetch<T>,
    primed: bool,
}

impl<T: Send + 'static> Live<T> {
    /// Projection recomputed by `fetch` whenever `changes` moves
    pub fn new<F, Fut>(changes: watch::Receiver<u64>, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DomainResult<T>> + Send + 'static,
    {
        let fetch: Fetch<T> = Arc::new(move || -> BoxFuture<DomainResult<T>> { Box::pin(fetch()) });
        Self {
            changes,
            fetch,
            primed: false,
        }
    }

    /// Wait for the next emission. Returns false once the store is gone.
    ///
    /// Cancel-safe: usable as a `tokio::select!` branch.
    pub async fn changed(&mut self) -> bool {
        if !self.primed {
            self.primed = true;
            self.changes.borrow_and_update();
            return true;
        }
        self.changes.changed().await.is_ok()
    }

    /// Recompute the projection now
    pub async fn current(&self) -> DomainResult<T> {
        (self.fetch)().await
    }

    /// `changed()` then `current()`; `None` when the sequence has ended
    pub async fn next(&mut self) -> Option<DomainResult<T>> {
        if !self.changed().await {
            return None;
        }
        Some(self.current().await)
    }
}

impl<T> Clone for Live<T> {
    /// A fresh subscriber: starts again with the current state
    fn clone(&self) -> Self {
        Self {
            changes: self.changes.clone(),
            fetch: self.fetch.clone(),
            primed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn counter_live() -> (watch::Sender<u64>, Arc<AtomicU64>, Live<u64>) {
        let (tx, rx) = watch::channel(0);
        let value = Arc::new(AtomicU64::new(1));
        let source = value.clone();
        let live = Live::new(rx, move || {
            let source = source.clone();
            async move { Ok(source.load(Ordering::SeqCst)) }
        });
        (tx, value, live)
    }

    #[tokio::test]
    async fn test_first_emission_is_immediate() {
        let (_tx, _value, mut live) = counter_live();
        let first = live.next().await.unwrap().unwrap();
        assert_eq!(first, 1);
    }

    #[tokio::test]
    async fn test_changes_coalesce_to_latest() {
        let (tx, value, mut live) = counter_live();
        live.next().await.unwrap().unwrap();

        value.store(2, Ordering::SeqCst);
        tx.send_modify(|v| *v += 1);
        value.store(3, Ordering::SeqCst);
        tx.send_modify(|v| *v += 1);

        assert_eq!(live.next().await.unwrap().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_ends_when_store_dropped() {
        let (tx, _value, mut live) = counter_live();
        live.next().await.unwrap().unwrap();
        drop(tx);
        assert!(live.next().await.is_none());
    }

    #[tokio::test]
    async fn test_clone_restarts_with_current_state() {
        let (_tx, value, mut live) = counter_live();
        live.next().await.unwrap().unwrap();

        value.store(7, Ordering::SeqCst);
        let mut again = live.clone();
        assert_eq!(again.next().await.unwrap().unwrap(), 7);
    }
}
