//! Propagation of size changes up the ancestor chain.

use tracing::debug;

use arbor_core::result::AppResult;
use arbor_core::types::FolderId;
use arbor_entity::folder::Folder;

use crate::context::StoreContext;

/// Keeps every folder's `size_bytes` equal to the bytes in its subtree.
///
/// The chain is read once and each ancestor then gets its own atomic
/// increment. Concurrent rollups touching the same ancestors commute.
#[derive(Debug, Clone)]
pub struct SizeRollup {
    ctx: StoreContext,
}

impl SizeRollup {
    /// Creates a new rollup maintainer.
    pub fn new(ctx: StoreContext) -> Self {
        Self { ctx }
    }

    /// Add `delta` to `start` and every folder above it, root included.
    pub async fn apply_delta(&self, start: FolderId, delta: i64) -> AppResult<()> {
        if delta == 0 {
            return Ok(());
        }
        let chain = self.ctx.meta.find_ancestors(start).await?;
        self.apply_delta_along(&chain, delta).await
    }

    /// Add `delta` to every folder of an already loaded chain.
    pub async fn apply_delta_along(&self, chain: &[Folder], delta: i64) -> AppResult<()> {
        if delta == 0 {
            return Ok(());
        }
        for folder in chain {
            self.ctx.meta.increment_folder_size(folder.id, delta).await?;
        }
        debug!(
            start = ?chain.first().map(|f| f.id),
            levels = chain.len(),
            delta,
            "Rolled up size change"
        );
        Ok(())
    }
}
