//! Snapshot persistence.
//!
//! The whole tracker state is read and written as one JSON document.

pub mod snapshot;

pub use snapshot::{SnapshotStore, StoreError};
