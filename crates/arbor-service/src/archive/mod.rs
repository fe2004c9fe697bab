//! Subtree export as a single zip archive.

pub mod collect;
pub mod export;

pub use collect::{ArchiveEntry, ArchivePlan};
pub use export::{ArchiveService, ArchiveSummary};
