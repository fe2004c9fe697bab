//! Chunked transfers between local files and byte streams.

use std::path::Path;

use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

use arbor_core::error::{AppError, ErrorKind};
use arbor_core::result::AppResult;
use arbor_core::traits::blob::ByteStream;

/// Open a local file as a stream of `chunk_size` pieces.
pub async fn file_stream(path: &Path, chunk_size: usize) -> AppResult<ByteStream> {
    let file = fs::File::open(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found(format!("Local file not found: {}", path.display()))
        } else {
            AppError::with_source(
                ErrorKind::Resource,
                format!("Failed to open local file: {}", path.display()),
                e,
            )
        }
    })?;
    Ok(Box::pin(ReaderStream::with_capacity(file, chunk_size.max(1))))
}

/// Drain a stream into a file at `dest`, creating or truncating it.
///
/// Returns the number of bytes written.
pub async fn write_stream_to_file(mut stream: ByteStream, dest: &Path) -> AppResult<u64> {
    let mut file = fs::File::create(dest).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Resource,
            format!("Failed to create file: {}", dest.display()),
            e,
        )
    })?;

    let mut total_bytes = 0u64;
    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| AppError::with_source(ErrorKind::Resource, "Stream read error", e))?;
        total_bytes += chunk.len() as u64;
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Resource, "Failed to write chunk", e))?;
    }

    file.flush()
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Resource, "Failed to flush file", e))?;

    debug!(path = %dest.display(), bytes = total_bytes, "Wrote file from stream");
    Ok(total_bytes)
}

/// Compare two streams byte for byte without buffering either one.
///
/// The streams may chunk their content differently. Only the unmatched
/// tail of the last chunk from each side is held at any time.
pub async fn streams_equal(mut left: ByteStream, mut right: ByteStream) -> AppResult<bool> {
    let mut left_buf = Bytes::new();
    let mut right_buf = Bytes::new();

    loop {
        if left_buf.is_empty() {
            left_buf = match next_chunk(&mut left).await? {
                Some(chunk) => chunk,
                None => return Ok(right_buf.is_empty() && next_chunk(&mut right).await?.is_none()),
            };
        }
        if right_buf.is_empty() {
            right_buf = match next_chunk(&mut right).await? {
                Some(chunk) => chunk,
                None => return Ok(false),
            };
        }

        let n = left_buf.len().min(right_buf.len());
        if left_buf[..n] != right_buf[..n] {
            return Ok(false);
        }
        left_buf = left_buf.slice(n..);
        right_buf = right_buf.slice(n..);
    }
}

/// Next non-empty chunk of a stream.
async fn next_chunk(stream: &mut ByteStream) -> AppResult<Option<Bytes>> {
    while let Some(chunk) = stream.next().await {
        let chunk =
            chunk.map_err(|e| AppError::with_source(ErrorKind::Resource, "Stream read error", e))?;
        if !chunk.is_empty() {
            return Ok(Some(chunk));
        }
    }
    Ok(None)
}
