//! Read-only text renderings of folders and files.

pub mod html;
pub mod json;
pub mod xml;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_entity::file::File;
use arbor_entity::folder::FolderNode;

pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use xml::XmlRenderer;

/// Turns retrieved nodes into a textual document.
pub trait Renderer: Send + Sync + fmt::Debug {
    /// MIME type of the output.
    fn content_type(&self) -> &'static str;

    /// Render a folder with whatever children it carries.
    fn render_folder(&self, node: &FolderNode) -> AppResult<String>;

    /// Render a single file.
    fn render_file(&self, file: &File) -> AppResult<String>;
}

/// The available renderers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// JSON document.
    #[default]
    Json,
    /// XML document.
    Xml,
    /// HTML fragment.
    Html,
}

impl RenderFormat {
    /// The renderer for this format.
    pub fn renderer(self) -> Box<dyn Renderer> {
        match self {
            Self::Json => Box::new(JsonRenderer),
            Self::Xml => Box::new(XmlRenderer),
            Self::Html => Box::new(HtmlRenderer),
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Xml => write!(f, "xml"),
            Self::Html => write!(f, "html"),
        }
    }
}

impl FromStr for RenderFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            "html" => Ok(Self::Html),
            other => Err(AppError::invalid_argument(format!(
                "Unknown render format: {other}"
            ))),
        }
    }
}

/// Escape text for XML and HTML element content and attribute values.
pub(crate) fn escape_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};

    use arbor_core::types::{FileId, FolderId};
    use arbor_entity::file::File;
    use arbor_entity::folder::{Folder, FolderNode};

    pub fn folder(name: &str, size: i64) -> Folder {
        Folder {
            id: FolderId::new(),
            parent_id: Some(FolderId::new()),
            name: name.to_string(),
            owner: 1000,
            group: 1000,
            permissions: 0o755,
            depth: 1,
            size_bytes: size,
        }
    }

    pub fn file(name: &str, extension: &str, size: i64) -> File {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        File {
            id: FileId::new(),
            folder_id: FolderId::new(),
            name: name.to_string(),
            extension: extension.to_string(),
            owner: 1000,
            group: 1000,
            permissions: 0o644,
            last_modified: at,
            size_bytes: size,
            checksum_sha256: "ab12".to_string(),
            uploaded_at: at,
        }
    }

    pub fn tree() -> FolderNode {
        FolderNode {
            folder: folder("docs", 11),
            files: vec![file("readme", "txt", 5)],
            subfolders: vec![FolderNode {
                folder: folder("img", 6),
                files: vec![file("logo", "png", 6)],
                subfolders: Vec::new(),
            }],
        }
    }
}
