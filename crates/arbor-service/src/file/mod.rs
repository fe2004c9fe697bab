//! File services: ingestion, mutations, and downloads.

pub mod download;
pub mod service;
pub mod upload;

pub use download::DownloadService;
pub use service::FileService;
pub use upload::UploadService;

use arbor_core::error::AppError;
use arbor_core::result::AppResult;

/// Convert a byte count reported by a blob store into a record size.
pub(crate) fn signed_size(bytes: u64) -> AppResult<i64> {
    i64::try_from(bytes).map_err(|_| AppError::internal(format!("Size {bytes} out of range")))
}
