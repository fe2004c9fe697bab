//! External (local filesystem) tree models consumed by ingestion and sync.

pub mod model;

pub use model::{LocalFile, LocalFolder};
