//! Delimited path resolution against the stored tree.

use tracing::debug;

use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_core::types::{FileId, FolderId};
use arbor_entity::file::{File, join_file_name, split_file_name};
use arbor_entity::folder::Folder;

use crate::context::StoreContext;

/// Resolves paths to nodes and nodes back to paths.
///
/// Paths are relative to the root folder, whose own name never appears in
/// them. Leading and trailing delimiters are ignored, so `""`, `"/"` and
/// `"//"` all name the root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    ctx: StoreContext,
}

impl PathResolver {
    /// Creates a new path resolver.
    pub fn new(ctx: StoreContext) -> Self {
        Self { ctx }
    }

    /// Resolve a folder path.
    pub async fn resolve_folder(&self, path: &str, delimiter: char) -> AppResult<Folder> {
        let mut current = self.root().await?;
        for segment in segments(path, delimiter) {
            let parent_id = current.id;
            current = self
                .ctx
                .meta
                .find_folder_by_name(parent_id, segment)
                .await?
                .ok_or_else(|| AppError::folder_name_not_found(segment, parent_id))?;
        }
        debug!(path, folder_id = %current.id, "Resolved folder path");
        Ok(current)
    }

    /// Resolve a file path. The last segment is split at its final `.`.
    pub async fn resolve_file(&self, path: &str, delimiter: char) -> AppResult<File> {
        let (folder_path, file_name) = split_last(path, delimiter);
        if file_name.is_empty() {
            return Err(AppError::invalid_argument(format!(
                "Path '{path}' does not name a file"
            )));
        }
        let folder = self.resolve_folder(folder_path, delimiter).await?;
        let (name, extension) = split_file_name(file_name);
        self.ctx
            .meta
            .find_file_by_name(folder.id, name, extension)
            .await?
            .ok_or_else(|| AppError::file_name_not_found(name, extension, folder.id))
    }

    /// Folder names from below the root down to `folder_id`.
    pub async fn folder_segments(&self, folder_id: FolderId) -> AppResult<Vec<String>> {
        let chain = self.ctx.meta.find_ancestors(folder_id).await?;
        Ok(chain
            .into_iter()
            .rev()
            .filter(|f| !f.is_root())
            .map(|f| f.name)
            .collect())
    }

    /// Rebuild the path of a folder.
    pub async fn folder_path(&self, folder_id: FolderId, delimiter: char) -> AppResult<String> {
        let segments = self.folder_segments(folder_id).await?;
        Ok(segments.join(&delimiter.to_string()))
    }

    /// Rebuild the path of a file.
    pub async fn file_path(&self, file: &File, delimiter: char) -> AppResult<String> {
        let mut segments = self.folder_segments(file.folder_id).await?;
        segments.push(join_file_name(&file.name, &file.extension));
        Ok(segments.join(&delimiter.to_string()))
    }

    /// Whether a folder path resolves.
    pub async fn folder_exists_at(&self, path: &str, delimiter: char) -> AppResult<bool> {
        absent_is_false(self.resolve_folder(path, delimiter).await)
    }

    /// Whether a file path resolves.
    pub async fn file_exists_at(&self, path: &str, delimiter: char) -> AppResult<bool> {
        absent_is_false(self.resolve_file(path, delimiter).await)
    }

    /// Whether a folder id exists.
    pub async fn folder_exists(&self, id: FolderId) -> AppResult<bool> {
        Ok(self.ctx.meta.find_folder(id).await?.is_some())
    }

    /// Whether a file id exists.
    pub async fn file_exists(&self, id: FileId) -> AppResult<bool> {
        Ok(self.ctx.meta.find_file(id).await?.is_some())
    }

    async fn root(&self) -> AppResult<Folder> {
        self.ctx
            .meta
            .find_folder(self.ctx.root_id)
            .await?
            .ok_or_else(|| AppError::folder_not_found(self.ctx.root_id))
    }
}

/// Non-empty segments of a delimited path.
pub fn segments(path: &str, delimiter: char) -> impl Iterator<Item = &str> {
    path.trim_matches(delimiter)
        .split(delimiter)
        .filter(|s| !s.is_empty())
}

/// Split a path into everything before the last segment and the last segment.
pub fn split_last(path: &str, delimiter: char) -> (&str, &str) {
    let trimmed = path.trim_matches(delimiter);
    match trimmed.rsplit_once(delimiter) {
        Some((parent, last)) => (parent, last),
        None => ("", trimmed),
    }
}

fn absent_is_false<T>(result: AppResult<T>) -> AppResult<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_ignore_outer_delimiters() {
        let parts: Vec<_> = segments("/a/b/", '/').collect();
        assert_eq!(parts, vec!["a", "b"]);
        assert_eq!(segments("//", '/').count(), 0);
        assert_eq!(segments("", '/').count(), 0);
        let parts: Vec<_> = segments("a\\b", '\\').collect();
        assert_eq!(parts, vec!["a", "b"]);
    }

    #[test]
    fn test_split_last() {
        assert_eq!(split_last("a/b/c.txt", '/'), ("a/b", "c.txt"));
        assert_eq!(split_last("/c.txt", '/'), ("", "c.txt"));
        assert_eq!(split_last("", '/'), ("", ""));
    }
}
