//! Archive export configuration.

use serde::{Deserialize, Serialize};

/// Compression applied to archive entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveCompression {
    /// Entries are stored as-is.
    Stored,
    /// Entries are deflated.
    #[default]
    Deflated,
}

/// Archive export configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Directory for buffered-export temporary files (system temp dir when unset).
    #[serde(default)]
    pub temp_dir: Option<String>,
    /// Entry compression.
    #[serde(default)]
    pub compression: ArchiveCompression,
}
