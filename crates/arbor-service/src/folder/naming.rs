//! Collision-free names for new siblings.

use arbor_core::result::AppResult;
use arbor_core::types::FolderId;

use crate::context::StoreContext;

/// Picks free names among the committed children of a folder.
///
/// A taken name `n` becomes the first free one of `n (1)`, `n (2)`, ...
/// File extensions are kept out of the counter, so `a.txt` becomes
/// `a (1).txt`.
#[derive(Debug, Clone)]
pub struct NameDisambiguator {
    ctx: StoreContext,
}

impl NameDisambiguator {
    /// Creates a new disambiguator.
    pub fn new(ctx: StoreContext) -> Self {
        Self { ctx }
    }

    /// A subfolder name under `parent_id` that no sibling holds yet.
    pub async fn free_folder_name(&self, parent_id: FolderId, name: &str) -> AppResult<String> {
        if self.ctx.meta.find_folder_by_name(parent_id, name).await?.is_none() {
            return Ok(name.to_string());
        }
        let mut counter = 1u64;
        loop {
            let candidate = numbered(name, counter);
            if self
                .ctx
                .meta
                .find_folder_by_name(parent_id, &candidate)
                .await?
                .is_none()
            {
                return Ok(candidate);
            }
            counter += 1;
        }
    }

    /// A file name under `folder_id` that, with `extension`, no sibling holds yet.
    pub async fn free_file_name(
        &self,
        folder_id: FolderId,
        name: &str,
        extension: &str,
    ) -> AppResult<String> {
        if self
            .ctx
            .meta
            .find_file_by_name(folder_id, name, extension)
            .await?
            .is_none()
        {
            return Ok(name.to_string());
        }
        let mut counter = 1u64;
        loop {
            let candidate = numbered(name, counter);
            if self
                .ctx
                .meta
                .find_file_by_name(folder_id, &candidate, extension)
                .await?
                .is_none()
            {
                return Ok(candidate);
            }
            counter += 1;
        }
    }
}

fn numbered(name: &str, counter: u64) -> String {
    format!("{name} ({counter})")
}
