//! Saved views

pub mod config;
pub mod store;

pub use config::{ViewConfig, ViewField, ViewPatch};
pub use store::ViewStore;
