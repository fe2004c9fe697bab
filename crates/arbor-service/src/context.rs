//! Shared handles every service works through.

use std::sync::Arc;

use tracing::info;

use arbor_core::config::{AppConfig, ArchiveConfig, TreeConfig};
use arbor_core::error::ErrorKind;
use arbor_core::result::AppResult;
use arbor_core::traits::blob::BlobStore;
use arbor_core::types::FolderId;
use arbor_database::MetadataStore;
use arbor_entity::folder::{CreateFolder, Folder};

/// The stores plus the resolved root folder.
///
/// Built once by [`StoreContext::bootstrap`] and cloned into each service.
#[derive(Debug, Clone)]
pub struct StoreContext {
    /// Folder and file records.
    pub meta: Arc<dyn MetadataStore>,
    /// File contents.
    pub blobs: Arc<dyn BlobStore>,
    /// Id of the root folder.
    pub root_id: FolderId,
    /// Tree settings.
    pub tree: TreeConfig,
    /// Archive settings.
    pub archive: ArchiveConfig,
    /// Transfer chunk size in bytes.
    pub chunk_size: usize,
}

impl StoreContext {
    /// Find the root folder, creating it on first use.
    pub async fn bootstrap(
        meta: Arc<dyn MetadataStore>,
        blobs: Arc<dyn BlobStore>,
        config: &AppConfig,
    ) -> AppResult<Self> {
        let root = ensure_root(meta.as_ref(), &config.tree).await?;
        info!(
            root_id = %root.id,
            root_name = %root.name,
            blob_store = blobs.provider_type(),
            "Store context ready"
        );
        Ok(Self {
            meta,
            blobs,
            root_id: root.id,
            tree: config.tree.clone(),
            archive: config.archive.clone(),
            chunk_size: config.storage.chunk_size_bytes.max(1),
        })
    }

    /// Default path delimiter.
    pub fn delimiter(&self) -> char {
        self.tree.delimiter
    }
}

async fn ensure_root(meta: &dyn MetadataStore, tree: &TreeConfig) -> AppResult<Folder> {
    if let Some(root) = meta.find_root(&tree.root_name).await? {
        return Ok(root);
    }
    let data = CreateFolder {
        parent_id: None,
        name: tree.root_name.clone(),
        owner: tree.root_owner,
        group: tree.root_group,
        permissions: tree.root_permissions,
        depth: 0,
    };
    match meta.insert_folder(&data).await {
        Ok(root) => {
            info!(root_id = %root.id, "Created root folder");
            Ok(root)
        }
        // Another process created the root between the lookup and the insert.
        Err(e) if e.kind == ErrorKind::NameConflict => meta
            .find_root(&tree.root_name)
            .await?
            .ok_or(e),
        Err(e) => Err(e),
    }
}
