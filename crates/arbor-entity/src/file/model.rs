//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use arbor_core::types::{FileId, FolderId};

/// A file stored in Arbor. Its content lives in the blob store under
/// [`File::blob_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The folder containing this file.
    pub folder_id: FolderId,
    /// The file name without its extension.
    pub name: String,
    /// The extension, empty when the file has none.
    pub extension: String,
    /// Opaque owner id.
    pub owner: i64,
    /// Opaque group id.
    #[sqlx(rename = "group_id")]
    pub group: i64,
    /// Opaque permission bits.
    pub permissions: i32,
    /// Modification time of the source the content was taken from.
    pub last_modified: DateTime<Utc>,
    /// File size in bytes.
    pub size_bytes: i64,
    /// SHA-256 checksum of the content.
    pub checksum_sha256: String,
    /// When the blob store accepted the content.
    pub uploaded_at: DateTime<Utc>,
}

impl File {
    /// Key of the blob holding this file's content.
    pub fn blob_key(&self) -> String {
        self.id.to_string()
    }

    /// Name and extension joined back together.
    pub fn full_name(&self) -> String {
        super::name::join_file_name(&self.name, &self.extension)
    }
}

/// Data required to create a new file record. The id is assigned by the
/// caller because the blob is stored under it before the record exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// File id and blob key.
    pub id: FileId,
    /// The folder to place the file in.
    pub folder_id: FolderId,
    /// The file name.
    pub name: String,
    /// The extension.
    pub extension: String,
    /// Owner id.
    pub owner: i64,
    /// Group id.
    pub group: i64,
    /// Permission bits.
    pub permissions: i32,
    /// Source modification time.
    pub last_modified: DateTime<Utc>,
    /// File size in bytes.
    pub size_bytes: i64,
    /// SHA-256 checksum.
    pub checksum_sha256: String,
    /// Blob store upload time.
    pub uploaded_at: DateTime<Utc>,
}

impl From<CreateFile> for File {
    fn from(data: CreateFile) -> Self {
        Self {
            id: data.id,
            folder_id: data.folder_id,
            name: data.name,
            extension: data.extension,
            owner: data.owner,
            group: data.group,
            permissions: data.permissions,
            last_modified: data.last_modified,
            size_bytes: data.size_bytes,
            checksum_sha256: data.checksum_sha256,
            uploaded_at: data.uploaded_at,
        }
    }
}
