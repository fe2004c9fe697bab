//! Folder entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use arbor_core::types::FolderId;

/// A folder in the stored hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Parent folder ID (null only for the root).
    pub parent_id: Option<FolderId>,
    /// Folder name, unique among its siblings.
    pub name: String,
    /// Opaque owner id.
    pub owner: i64,
    /// Opaque group id.
    #[sqlx(rename = "group_id")]
    pub group: i64,
    /// Opaque permission bits.
    pub permissions: i32,
    /// Depth in the folder tree (0 for the root).
    pub depth: i32,
    /// Sum of the sizes of every file in the subtree rooted here.
    pub size_bytes: i64,
}

impl Folder {
    /// Check if this is the root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder. The store assigns the id and
/// starts the aggregate size at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Parent folder (None only for the root).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// Owner id.
    pub owner: i64,
    /// Group id.
    pub group: i64,
    /// Permission bits.
    pub permissions: i32,
    /// Depth in the tree.
    pub depth: i32,
}

impl CreateFolder {
    /// A child of `parent` that inherits its ownership and permissions.
    pub fn child_of(parent: &Folder, name: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent.id),
            name: name.into(),
            owner: parent.owner,
            group: parent.group,
            permissions: parent.permissions,
            depth: parent.depth + 1,
        }
    }
}
