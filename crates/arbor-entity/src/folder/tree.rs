//! Materialized folder trees as returned by retrieval.

use serde::{Deserialize, Serialize};

use super::model::Folder;
use crate::file::File;

/// A folder together with its files and subfolders.
///
/// When retrieved without children both collections are empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderNode {
    /// The folder record.
    pub folder: Folder,
    /// Files directly inside the folder.
    pub files: Vec<File>,
    /// Child folder nodes.
    pub subfolders: Vec<FolderNode>,
}

impl FolderNode {
    /// A node with no materialized children.
    pub fn leaf(folder: Folder) -> Self {
        Self {
            folder,
            files: Vec::new(),
            subfolders: Vec::new(),
        }
    }

    /// Number of files in the whole subtree.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.subfolders.iter().map(FolderNode::file_count).sum::<usize>()
    }

    /// Find a direct subfolder by name.
    pub fn subfolder(&self, name: &str) -> Option<&FolderNode> {
        self.subfolders.iter().find(|n| n.folder.name == name)
    }
}
