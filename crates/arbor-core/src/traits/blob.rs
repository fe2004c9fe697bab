//! Blob store trait for pluggable file content backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading and writing blob contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// What the blob store recorded for a stored blob.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlobReceipt {
    /// Number of bytes written.
    pub size_bytes: u64,
    /// Hex-encoded SHA-256 of the content.
    pub checksum_sha256: String,
    /// When the store accepted the blob.
    pub stored_at: DateTime<Utc>,
}

/// Opaque byte-stream storage keyed by an identifier.
///
/// Implementations exist for a local directory and for memory. The trait
/// is defined here in `arbor-core` and implemented in `arbor-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Consume the stream and store it under `key`, replacing any
    /// previous blob with that key.
    async fn put(&self, key: &str, stream: ByteStream) -> AppResult<BlobReceipt>;

    /// Open a blob for reading.
    async fn open_read(&self, key: &str) -> AppResult<ByteStream>;

    /// Delete a blob. Deleting a missing blob is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a blob exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
