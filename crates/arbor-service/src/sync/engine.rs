//! Merge-forward synchronization.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use arbor_core::result::AppResult;
use arbor_core::types::FolderId;
use arbor_entity::local::LocalFolder;

use crate::context::StoreContext;
use crate::file::download::DownloadService;
use crate::file::service::FileService;
use crate::file::upload::UploadService;
use crate::folder::tree::TreeService;

/// Counts of what a sync run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Files that had no stored counterpart.
    pub uploaded: usize,
    /// Stored files whose content changed.
    pub replaced: usize,
    /// Stored files already identical to the local ones.
    pub skipped: usize,
    /// Folders created, including those inside new subtrees.
    pub folders_created: usize,
}

impl SyncReport {
    /// Whether the run changed anything.
    pub fn is_noop(&self) -> bool {
        self.uploaded == 0 && self.replaced == 0 && self.folders_created == 0
    }
}

/// Brings a stored folder up to date with a local directory.
///
/// Stored nodes without a local counterpart are left alone, so this is a
/// merge rather than a mirror.
#[derive(Debug, Clone)]
pub struct SyncService {
    ctx: StoreContext,
    tree: TreeService,
    uploads: UploadService,
    files: FileService,
    downloads: DownloadService,
}

impl SyncService {
    /// Creates a new sync service.
    pub fn new(ctx: StoreContext) -> Self {
        Self {
            tree: TreeService::new(ctx.clone()),
            uploads: UploadService::new(ctx.clone()),
            files: FileService::new(ctx.clone()),
            downloads: DownloadService::new(ctx.clone()),
            ctx,
        }
    }

    /// Merge the contents of `local` into the stored folder `stored_id`.
    pub async fn update_folder(
        &self,
        stored_id: FolderId,
        local: &LocalFolder,
    ) -> AppResult<SyncReport> {
        let stored = self.tree.folder(stored_id).await?;
        let mut report = SyncReport::default();
        let mut work: VecDeque<(FolderId, &LocalFolder)> = VecDeque::from([(stored.id, local)]);

        while let Some((folder_id, local_folder)) = work.pop_front() {
            for local_file in &local_folder.files {
                let existing = self
                    .ctx
                    .meta
                    .find_file_by_name(folder_id, &local_file.name, &local_file.extension)
                    .await?;
                match existing {
                    Some(stored_file) => {
                        if self.downloads.files_identical(&stored_file, local_file).await? {
                            report.skipped += 1;
                        } else {
                            self.files.replace_file(&stored_file, local_file).await?;
                            report.replaced += 1;
                        }
                    }
                    None => {
                        self.uploads.upload_file(local_file, folder_id, true).await?;
                        report.uploaded += 1;
                    }
                }
            }

            for sub in &local_folder.subfolders {
                match self.ctx.meta.find_folder_by_name(folder_id, &sub.name).await? {
                    Some(existing) => work.push_back((existing.id, sub)),
                    None => {
                        self.uploads.upload_folder(sub, folder_id).await?;
                        let (folders, files) = count_tree(sub);
                        report.folders_created += folders;
                        report.uploaded += files;
                    }
                }
            }
            debug!(folder_id = %folder_id, "Synced folder level");
        }

        info!(
            folder_id = %stored_id,
            uploaded = report.uploaded,
            replaced = report.replaced,
            skipped = report.skipped,
            folders_created = report.folders_created,
            "Sync finished"
        );
        Ok(report)
    }
}

/// Folder and file counts of a local subtree, the subtree root included.
fn count_tree(local: &LocalFolder) -> (usize, usize) {
    let mut folders = 0;
    let mut files = 0;
    let mut stack = vec![local];
    while let Some(folder) = stack.pop() {
        folders += 1;
        files += folder.files.len();
        stack.extend(folder.subfolders.iter());
    }
    (folders, files)
}
