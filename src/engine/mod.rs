//! List state and the derivation pipeline

pub mod pipeline;
pub mod state;

pub use pipeline::{DerivedView, GroupBucket, available_keys, derive, prune_selection, refresh};
pub use state::ListState;
