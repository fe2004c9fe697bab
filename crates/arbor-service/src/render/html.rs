//! HTML rendering.

use std::fmt::Write;

use arbor_core::result::AppResult;
use arbor_entity::file::File;
use arbor_entity::folder::FolderNode;

use super::{Renderer, escape_markup};

/// Renders nodes as nested HTML lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

fn file_item(file: &File) -> String {
    format!(
        "<li class=\"file\"><span class=\"name\">{}</span> <span class=\"size\">{} B</span> <span class=\"modified\">{}</span></li>",
        escape_markup(&file.full_name()),
        file.size_bytes,
        file.last_modified.format("%Y-%m-%d %H:%M:%S"),
    )
}

fn write_folder(out: &mut String, node: &FolderNode) {
    let _ = write!(
        out,
        "<li class=\"folder\"><span class=\"name\">{}</span> <span class=\"size\">{} B</span>",
        escape_markup(&node.folder.name),
        node.folder.size_bytes,
    );
    if !node.files.is_empty() || !node.subfolders.is_empty() {
        out.push_str("<ul>");
        for sub in &node.subfolders {
            write_folder(out, sub);
        }
        for file in &node.files {
            out.push_str(&file_item(file));
        }
        out.push_str("</ul>");
    }
    out.push_str("</li>");
}

impl Renderer for HtmlRenderer {
    fn content_type(&self) -> &'static str {
        "text/html"
    }

    fn render_folder(&self, node: &FolderNode) -> AppResult<String> {
        let mut out = String::from("<ul class=\"tree\">");
        write_folder(&mut out, node);
        out.push_str("</ul>");
        Ok(out)
    }

    fn render_file(&self, file: &File) -> AppResult<String> {
        Ok(format!("<ul class=\"tree\">{}</ul>", file_item(file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures;

    #[test]
    fn test_folder_html_lists_children() {
        let out = HtmlRenderer.render_folder(&fixtures::tree()).unwrap();
        assert!(out.starts_with("<ul class=\"tree\"><li class=\"folder\">"));
        assert!(out.contains("<span class=\"name\">img</span>"));
        assert!(out.contains("<span class=\"name\">logo.png</span>"));
        assert!(out.contains("2024-05-01 12:00:00"));
        assert_eq!(out.matches("<ul").count(), out.matches("</ul>").count());
    }
}
