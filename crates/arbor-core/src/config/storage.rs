//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Blob store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the local blob store.
    #[serde(default = "default_blob_root")]
    pub blob_root: String,
    /// Chunk size in bytes for every streamed transfer (default 64 KiB).
    #[serde(default = "default_chunk_size")]
    pub chunk_size_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            blob_root: default_blob_root(),
            chunk_size_bytes: default_chunk_size(),
        }
    }
}

fn default_blob_root() -> String {
    "./data/blobs".to_string()
}

fn default_chunk_size() -> usize {
    64 * 1024
}
