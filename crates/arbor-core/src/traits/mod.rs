//! Core traits defined in `arbor-core` and implemented by other crates.

pub mod blob;

pub use blob::{BlobReceipt, BlobStore, ByteStream};
