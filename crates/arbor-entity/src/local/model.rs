//! In-memory snapshot of a directory tree on the local filesystem.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A regular file on the local filesystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalFile {
    /// Name without the extension.
    pub name: String,
    /// Extension, empty when absent.
    pub extension: String,
    /// Owner uid.
    pub owner: i64,
    /// Group gid.
    pub group: i64,
    /// Permission bits.
    pub permissions: i32,
    /// Modification time.
    pub last_modified: DateTime<Utc>,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Absolute path to the content.
    pub absolute_path: PathBuf,
}

/// A directory on the local filesystem with everything below it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalFolder {
    /// Directory name.
    pub name: String,
    /// Owner uid.
    pub owner: i64,
    /// Group gid.
    pub group: i64,
    /// Permission bits.
    pub permissions: i32,
    /// Modification time.
    pub last_modified: DateTime<Utc>,
    /// Absolute path of the directory.
    pub absolute_path: PathBuf,
    /// Files directly inside the directory.
    pub files: Vec<LocalFile>,
    /// Subdirectories.
    pub subfolders: Vec<LocalFolder>,
}

impl LocalFolder {
    /// Total bytes of every file in the subtree.
    pub fn size_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size_bytes).sum::<u64>()
            + self.subfolders.iter().map(LocalFolder::size_bytes).sum::<u64>()
    }

    /// Append a subfolder.
    pub fn add_subfolder(&mut self, subfolder: LocalFolder) {
        self.subfolders.push(subfolder);
    }

    /// Append a file.
    pub fn add_file(&mut self, file: LocalFile) {
        self.files.push(file);
    }
}
