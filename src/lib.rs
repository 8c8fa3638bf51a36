//! Cat Breeds App
//!
//! View-state layer on top of the backend: holders that turn repository
//! streams and user intents into published screen state.

pub mod context;
pub mod messages;
pub mod store;
pub mod view_state;

#[cfg(test)]
mod test_support;

pub use context::AppContext;
