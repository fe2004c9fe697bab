//! # arbor-storage
//!
//! Blob store implementations for Arbor, plus the stream helpers and the
//! local directory reader that ingestion, sync, and downloads build on.

pub mod checksum;
pub mod local_tree;
pub mod providers;
pub mod transfer;

pub use local_tree::{read_local_file, read_local_tree};
pub use providers::{LocalBlobStore, MemoryBlobStore};
