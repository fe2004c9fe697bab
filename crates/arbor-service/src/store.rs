//! One handle over every tree service.

use std::sync::Arc;

use arbor_core::config::AppConfig;
use arbor_core::result::AppResult;
use arbor_core::traits::blob::BlobStore;
use arbor_core::types::FolderId;
use arbor_database::MetadataStore;

use crate::archive::ArchiveService;
use crate::context::StoreContext;
use crate::file::{DownloadService, FileService, UploadService};
use crate::folder::{FolderService, NameDisambiguator, PathResolver, SizeRollup, TreeService};
use crate::sync::SyncService;

/// The store as callers see it: a bootstrapped context plus its services.
#[derive(Debug, Clone)]
pub struct TreeStore {
    ctx: StoreContext,
    /// Path lookups.
    pub paths: PathResolver,
    /// Free sibling names.
    pub naming: NameDisambiguator,
    /// Ancestor size maintenance.
    pub rollup: SizeRollup,
    /// Retrieval.
    pub tree: TreeService,
    /// Ingestion.
    pub uploads: UploadService,
    /// Folder mutations.
    pub folders: FolderService,
    /// File mutations.
    pub files: FileService,
    /// Content reads.
    pub downloads: DownloadService,
    /// Merge-forward sync.
    pub sync: SyncService,
    /// Archive export.
    pub archives: ArchiveService,
}

impl TreeStore {
    /// Resolve or create the root and wire up every service.
    pub async fn open(
        meta: Arc<dyn MetadataStore>,
        blobs: Arc<dyn BlobStore>,
        config: &AppConfig,
    ) -> AppResult<Self> {
        let ctx = StoreContext::bootstrap(meta, blobs, config).await?;
        Ok(Self::from_context(ctx))
    }

    /// Wire up services over an existing context.
    pub fn from_context(ctx: StoreContext) -> Self {
        Self {
            paths: PathResolver::new(ctx.clone()),
            naming: NameDisambiguator::new(ctx.clone()),
            rollup: SizeRollup::new(ctx.clone()),
            tree: TreeService::new(ctx.clone()),
            uploads: UploadService::new(ctx.clone()),
            folders: FolderService::new(ctx.clone()),
            files: FileService::new(ctx.clone()),
            downloads: DownloadService::new(ctx.clone()),
            sync: SyncService::new(ctx.clone()),
            archives: ArchiveService::new(ctx.clone()),
            ctx,
        }
    }

    /// The shared context.
    pub fn context(&self) -> &StoreContext {
        &self.ctx
    }

    /// Id of the root folder.
    pub fn root_id(&self) -> FolderId {
        self.ctx.root_id
    }

    /// Default path delimiter.
    pub fn delimiter(&self) -> char {
        self.ctx.delimiter()
    }
}
