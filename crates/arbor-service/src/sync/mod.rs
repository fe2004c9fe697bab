//! One-way merge of a local tree into a stored folder.

pub mod engine;

pub use engine::{SyncReport, SyncService};
