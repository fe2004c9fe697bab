//! Breadth-first collection of the files an archive will hold.

use std::collections::{HashMap, VecDeque};

use chrono::Utc;
use serde::Serialize;

use arbor_core::result::AppResult;
use arbor_core::types::FolderId;
use arbor_entity::file::File;
use arbor_entity::folder::Folder;

use crate::context::StoreContext;
use crate::folder::resolver::PathResolver;

/// One file and the path it takes inside the archive.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveEntry {
    /// `/`-joined path relative to the exported folder.
    pub path: String,
    /// The stored file.
    pub file: File,
}

/// Everything needed to write an archive of one folder.
#[derive(Debug, Clone, Serialize)]
pub struct ArchivePlan {
    /// The exported folder.
    pub folder: Folder,
    /// Archive comment.
    pub comment: String,
    /// Entries in breadth-first order.
    pub entries: Vec<ArchiveEntry>,
}

impl ArchivePlan {
    /// Sum of the entry sizes.
    pub fn total_bytes(&self) -> i64 {
        self.entries.iter().map(|e| e.file.size_bytes).sum()
    }
}

/// Walk the subtree below `folder` and lay out its archive.
pub(crate) async fn collect(ctx: &StoreContext, folder: Folder) -> AppResult<ArchivePlan> {
    let root_id = folder.id;
    let mut index: HashMap<FolderId, (String, Option<FolderId>)> = HashMap::new();
    let mut folder_queue = VecDeque::from([folder.clone()]);
    let mut file_queue: Vec<File> = Vec::new();

    while let Some(current) = folder_queue.pop_front() {
        file_queue.extend(ctx.meta.list_files(current.id).await?);
        folder_queue.extend(ctx.meta.list_subfolders(current.id).await?);
        index.insert(current.id, (current.name, current.parent_id));
    }

    let entries = file_queue
        .into_iter()
        .map(|file| ArchiveEntry {
            path: entry_path(&index, root_id, &file),
            file,
        })
        .collect();

    let full_path = PathResolver::new(ctx.clone())
        .folder_path(root_id, '/')
        .await?;
    let comment = format!(
        "Archive of folder {full_path} on {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    );

    Ok(ArchivePlan {
        folder,
        comment,
        entries,
    })
}

/// Prepend folder names from the file's folder up to, not including, the root.
fn entry_path(
    index: &HashMap<FolderId, (String, Option<FolderId>)>,
    root_id: FolderId,
    file: &File,
) -> String {
    let mut segments = vec![file.full_name()];
    let mut current = file.folder_id;
    while current != root_id {
        match index.get(&current) {
            Some((name, Some(parent_id))) => {
                segments.push(name.clone());
                current = *parent_id;
            }
            _ => break,
        }
    }
    segments.reverse();
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use arbor_core::types::FileId;

    use super::*;

    fn file_in(folder_id: FolderId, name: &str, extension: &str) -> File {
        File {
            id: FileId::new(),
            folder_id,
            name: name.to_string(),
            extension: extension.to_string(),
            owner: 0,
            group: 0,
            permissions: 0o644,
            last_modified: Utc::now(),
            size_bytes: 1,
            checksum_sha256: String::new(),
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_entry_path_stops_at_export_root() {
        let above = FolderId::new();
        let root = FolderId::new();
        let img = FolderId::new();
        let icons = FolderId::new();
        let index = HashMap::from([
            (root, ("docs".to_string(), Some(above))),
            (img, ("img".to_string(), Some(root))),
            (icons, ("icons".to_string(), Some(img))),
        ]);

        assert_eq!(entry_path(&index, root, &file_in(root, "readme", "txt")), "readme.txt");
        assert_eq!(entry_path(&index, root, &file_in(img, "logo", "png")), "img/logo.png");
        assert_eq!(
            entry_path(&index, root, &file_in(icons, "Makefile", "")),
            "img/icons/Makefile"
        );
    }
}
