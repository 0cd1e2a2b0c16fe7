//! Core module - snapshot model, loading and configuration

pub mod config;
pub mod loader;
pub mod snapshot;

pub use config::Config;
pub use loader::{load_snapshot, SnapshotError};
pub use snapshot::{Metadata, Snapshot, StageOrder, CANONICAL_STAGE_ORDER};
