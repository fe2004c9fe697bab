//! JSON rendering via serde.

use serde::Serialize;

use arbor_core::result::AppResult;
use arbor_entity::file::File;
use arbor_entity::folder::FolderNode;

use super::Renderer;

/// Renders nodes as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

#[derive(Serialize)]
struct FileView<'a> {
    id: String,
    name: String,
    extension: &'a str,
    size_bytes: i64,
    owner: i64,
    group: i64,
    permissions: String,
    last_modified: String,
    uploaded_at: String,
    checksum_sha256: &'a str,
}

#[derive(Serialize)]
struct FolderView<'a> {
    id: String,
    name: &'a str,
    depth: i32,
    size_bytes: i64,
    owner: i64,
    group: i64,
    permissions: String,
    files: Vec<FileView<'a>>,
    subfolders: Vec<FolderView<'a>>,
}

impl<'a> From<&'a File> for FileView<'a> {
    fn from(file: &'a File) -> Self {
        Self {
            id: file.id.to_string(),
            name: file.full_name(),
            extension: &file.extension,
            size_bytes: file.size_bytes,
            owner: file.owner,
            group: file.group,
            permissions: format!("{:o}", file.permissions),
            last_modified: file.last_modified.to_rfc3339(),
            uploaded_at: file.uploaded_at.to_rfc3339(),
            checksum_sha256: &file.checksum_sha256,
        }
    }
}

impl<'a> From<&'a FolderNode> for FolderView<'a> {
    fn from(node: &'a FolderNode) -> Self {
        Self {
            id: node.folder.id.to_string(),
            name: &node.folder.name,
            depth: node.folder.depth,
            size_bytes: node.folder.size_bytes,
            owner: node.folder.owner,
            group: node.folder.group,
            permissions: format!("{:o}", node.folder.permissions),
            files: node.files.iter().map(FileView::from).collect(),
            subfolders: node.subfolders.iter().map(FolderView::from).collect(),
        }
    }
}

impl Renderer for JsonRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render_folder(&self, node: &FolderNode) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&FolderView::from(node))?)
    }

    fn render_file(&self, file: &File) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(&FileView::from(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;

    #[test]
    fn test_folder_json_nests_children() {
        let out = JsonRenderer.render_folder(&fixtures::tree()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["name"], "docs");
        assert_eq!(value["size_bytes"], 11);
        assert_eq!(value["files"][0]["name"], "readme.txt");
        assert_eq!(value["subfolders"][0]["files"][0]["name"], "logo.png");
        assert_eq!(value["permissions"], "755");
    }

    #[test]
    fn test_file_json() {
        let out = JsonRenderer
            .render_file(&fixtures::file("Makefile", "", 4))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["name"], "Makefile");
        assert_eq!(value["extension"], "");
        assert_eq!(value["checksum_sha256"], "ab12");
    }
}
