//! View-State Holders
//!
//! Each holder owns a tokio task that is the only writer of its published
//! state. Dropping the holder aborts the task.

mod filter;
mod list;
mod detail;
mod new_breed;

use std::future::Future;
use std::pin::Pin;

pub use filter::{annotate, favorite_ids, filter_breeds};
pub use list::{BreedList, BreedListState};
pub use detail::{BreedDetail, BreedDetailState, DetailPhase};
pub use new_breed::{Field, FieldError, NewBreedForm, NewBreedInput};

pub(crate) type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// Loading lifecycle of a holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Uninitialized,
    Loading,
    Ready,
}

/// Await the future in `slot`, or never resolve when it is empty.
/// Cancel-safe: the future stays in the slot until it completes.
pub(crate) async fn poll_slot<T>(slot: &mut Option<BoxFuture<T>>) -> T {
    match slot {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}
