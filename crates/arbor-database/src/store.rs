//! Metadata store trait for folder and file records.

use async_trait::async_trait;

use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_core::types::{FileId, FolderId};
use arbor_entity::file::{CreateFile, File};
use arbor_entity::folder::{CreateFolder, Folder};

/// Document-style access to folder and file records.
///
/// Every method touches a single record, or reads a set of records, and
/// is atomic on its own. There are no multi-record transactions. Size
/// changes go through [`MetadataStore::increment_folder_size`], which
/// must be a native atomic increment rather than a read-then-write.
#[async_trait]
pub trait MetadataStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find the parentless folder with the given name.
    async fn find_root(&self, name: &str) -> AppResult<Option<Folder>>;

    /// Find a folder by ID.
    async fn find_folder(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Find a folder by name under a parent.
    async fn find_folder_by_name(&self, parent_id: FolderId, name: &str)
    -> AppResult<Option<Folder>>;

    /// List the direct subfolders of a folder, ordered by name.
    async fn list_subfolders(&self, parent_id: FolderId) -> AppResult<Vec<Folder>>;

    /// Insert a folder with size zero and return it with its new id.
    async fn insert_folder(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Set a folder's name.
    async fn rename_folder(&self, id: FolderId, name: &str) -> AppResult<()>;

    /// Set a folder's parent and depth.
    async fn set_folder_parent(&self, id: FolderId, parent_id: FolderId, depth: i32)
    -> AppResult<()>;

    /// Set a folder's depth.
    async fn set_folder_depth(&self, id: FolderId, depth: i32) -> AppResult<()>;

    /// Atomically add `delta` to a folder's aggregate size.
    async fn increment_folder_size(&self, id: FolderId, delta: i64) -> AppResult<()>;

    /// Remove a folder record. Returns `true` if it existed.
    async fn remove_folder(&self, id: FolderId) -> AppResult<bool>;

    /// The chain from `id` up to and including the root, nearest first.
    ///
    /// The default walks parent links one lookup at a time; stores that
    /// can fetch the chain in one query should override it.
    async fn find_ancestors(&self, id: FolderId) -> AppResult<Vec<Folder>> {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(folder_id) = current {
            let folder = self
                .find_folder(folder_id)
                .await?
                .ok_or_else(|| AppError::folder_not_found(folder_id))?;
            current = folder.parent_id;
            chain.push(folder);
        }
        Ok(chain)
    }

    /// Find a file by ID.
    async fn find_file(&self, id: FileId) -> AppResult<Option<File>>;

    /// Find a file by name and extension inside a folder.
    async fn find_file_by_name(
        &self,
        folder_id: FolderId,
        name: &str,
        extension: &str,
    ) -> AppResult<Option<File>>;

    /// List the files of a folder, ordered by name and extension.
    async fn list_files(&self, folder_id: FolderId) -> AppResult<Vec<File>>;

    /// Insert a file record.
    async fn insert_file(&self, data: &CreateFile) -> AppResult<File>;

    /// Set a file's name and extension.
    async fn rename_file(&self, id: FileId, name: &str, extension: &str) -> AppResult<()>;

    /// Set a file's folder.
    async fn set_file_folder(&self, id: FileId, folder_id: FolderId) -> AppResult<()>;

    /// Remove a file record. Returns `true` if it existed.
    async fn remove_file(&self, id: FileId) -> AppResult<bool>;
}
