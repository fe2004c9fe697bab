//! In-memory blob store.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use chrono::Utc;
use dashmap::DashMap;
use futures::stream::{self, StreamExt};

use arbor_core::error::{AppError, ErrorKind};
use arbor_core::result::AppResult;
use arbor_core::traits::blob::{BlobReceipt, BlobStore, ByteStream};

use crate::checksum::ChecksumHasher;

/// Blob store that keeps every blob in a map.
#[derive(Debug)]
pub struct MemoryBlobStore {
    blobs: DashMap<String, Bytes>,
    chunk_size: usize,
    writes: AtomicU64,
}

impl MemoryBlobStore {
    /// Create an empty store that serves reads in `chunk_size` pieces.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            blobs: DashMap::new(),
            chunk_size: chunk_size.max(1),
            writes: AtomicU64::new(0),
        }
    }

    /// Number of puts and effective deletes so far.
    pub fn revision(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new(64 * 1024)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn put(&self, key: &str, mut stream: ByteStream) -> AppResult<BlobReceipt> {
        let mut buffer = BytesMut::new();
        let mut hasher = ChecksumHasher::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Resource, "Stream read error", e))?;
            hasher.update(&chunk);
            buffer.extend_from_slice(&chunk);
        }
        let (size_bytes, checksum_sha256) = hasher.finish();
        self.blobs.insert(key.to_string(), buffer.freeze());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(BlobReceipt {
            size_bytes,
            checksum_sha256,
            stored_at: Utc::now(),
        })
    }

    async fn open_read(&self, key: &str) -> AppResult<ByteStream> {
        let data = self
            .blobs
            .get(key)
            .map(|b| b.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {key}")))?;
        let chunks: Vec<Result<Bytes, std::io::Error>> = (0..data.len())
            .step_by(self.chunk_size)
            .map(|start| {
                let end = (start + self.chunk_size).min(data.len());
                Ok(data.slice(start..end))
            })
            .collect();
        Ok(Box::pin(stream::iter(chunks)))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        if self.blobs.remove(key).is_some() {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.blobs.contains_key(key))
    }
}
