//! Folder tree configuration.

use serde::{Deserialize, Serialize};

/// Settings for the stored folder tree and its root folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Reserved name of the root folder.
    #[serde(default = "default_root_name")]
    pub root_name: String,
    /// Default path delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Owner recorded on a freshly created root.
    #[serde(default)]
    pub root_owner: i64,
    /// Group recorded on a freshly created root.
    #[serde(default)]
    pub root_group: i64,
    /// Permission bits recorded on a freshly created root.
    #[serde(default = "default_root_permissions")]
    pub root_permissions: i32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root_name: default_root_name(),
            delimiter: default_delimiter(),
            root_owner: 0,
            root_group: 0,
            root_permissions: default_root_permissions(),
        }
    }
}

fn default_root_name() -> String {
    "ROOT".to_string()
}

fn default_delimiter() -> char {
    '/'
}

fn default_root_permissions() -> i32 {
    0o7777
}
