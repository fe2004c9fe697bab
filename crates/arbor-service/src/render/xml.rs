//! XML rendering.

use std::fmt::Write;

use arbor_core::result::AppResult;
use arbor_entity::file::File;
use arbor_entity::folder::FolderNode;

use super::{Renderer, escape_markup};

/// Renders nodes as an XML document with nested `<folder>` elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlRenderer;

const HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

fn write_file(out: &mut String, file: &File, indent: usize) {
    let pad = "  ".repeat(indent);
    let _ = writeln!(
        out,
        "{pad}<file id=\"{}\" name=\"{}\" extension=\"{}\" size=\"{}\" owner=\"{}\" group=\"{}\" permissions=\"{:o}\" modified=\"{}\" uploaded=\"{}\" sha256=\"{}\"/>",
        file.id,
        escape_markup(&file.name),
        escape_markup(&file.extension),
        file.size_bytes,
        file.owner,
        file.group,
        file.permissions,
        file.last_modified.to_rfc3339(),
        file.uploaded_at.to_rfc3339(),
        escape_markup(&file.checksum_sha256),
    );
}

fn write_folder(out: &mut String, node: &FolderNode, indent: usize) {
    let pad = "  ".repeat(indent);
    let folder = &node.folder;
    let _ = write!(
        out,
        "{pad}<folder id=\"{}\" name=\"{}\" depth=\"{}\" size=\"{}\" owner=\"{}\" group=\"{}\" permissions=\"{:o}\"",
        folder.id,
        escape_markup(&folder.name),
        folder.depth,
        folder.size_bytes,
        folder.owner,
        folder.group,
        folder.permissions,
    );
    if node.files.is_empty() && node.subfolders.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    for file in &node.files {
        write_file(out, file, indent + 1);
    }
    for sub in &node.subfolders {
        write_folder(out, sub, indent + 1);
    }
    let _ = writeln!(out, "{pad}</folder>");
}

impl Renderer for XmlRenderer {
    fn content_type(&self) -> &'static str {
        "application/xml"
    }

    fn render_folder(&self, node: &FolderNode) -> AppResult<String> {
        let mut out = String::from(HEADER);
        write_folder(&mut out, node, 0);
        Ok(out)
    }

    fn render_file(&self, file: &File) -> AppResult<String> {
        let mut out = String::from(HEADER);
        write_file(&mut out, file, 0);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;

    #[test]
    fn test_folder_xml_nests_children() {
        let out = XmlRenderer.render_folder(&fixtures::tree()).unwrap();
        assert!(out.starts_with("<?xml"));
        assert!(out.contains("<folder id="));
        assert!(out.contains("name=\"readme\" extension=\"txt\""));
        assert!(out.contains("  <folder id="));
        assert!(out.contains("name=\"img\""));
        assert!(out.trim_end().ends_with("</folder>"));
    }

    #[test]
    fn test_names_are_escaped() {
        let out = XmlRenderer
            .render_file(&fixtures::file("a<b>", "txt", 1))
            .unwrap();
        assert!(out.contains("name=\"a&lt;b&gt;\""));
    }
}
