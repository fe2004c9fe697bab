//! Folder listing, creation, and rendering commands.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use arbor_core::config::AppConfig;
use arbor_core::result::AppResult;
use arbor_entity::file::File;
use arbor_entity::folder::Folder;
use arbor_service::RenderFormat;

use super::Node;
use crate::output::{self, OutputFormat};

/// Arguments for `mkdir`
#[derive(Debug, Args)]
pub struct MkdirArgs {
    /// Folder path to create
    pub path: String,
}

/// Arguments for `ls`
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Folder path (root when omitted)
    #[arg(default_value = "")]
    pub path: String,
}

/// Arguments for `tree`
#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Folder or file path (root when omitted)
    #[arg(default_value = "")]
    pub path: String,
    /// Rendering: json, xml, or html
    #[arg(short, long, default_value = "json")]
    pub render: RenderFormat,
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
pub struct FolderRow {
    /// Folder ID
    id: String,
    /// Path
    path: String,
    /// Depth
    depth: i32,
    /// Aggregate size
    size_bytes: i64,
    /// Permission bits
    permissions: String,
}

impl FolderRow {
    /// Build a row for a folder at a known path.
    pub fn new(folder: &Folder, path: String) -> Self {
        Self {
            id: folder.id.to_string(),
            path,
            depth: folder.depth,
            size_bytes: folder.size_bytes,
            permissions: format!("{:o}", folder.permissions),
        }
    }
}

/// Listing row
#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    /// "dir" or "file"
    kind: &'static str,
    /// Name
    name: String,
    /// Size in bytes
    size_bytes: i64,
    /// Owner
    owner: i64,
    /// Group
    group: i64,
    /// Permission bits
    permissions: String,
    /// Last modified (files only)
    modified: String,
}

impl From<&Folder> for EntryRow {
    fn from(folder: &Folder) -> Self {
        Self {
            kind: "dir",
            name: folder.name.clone(),
            size_bytes: folder.size_bytes,
            owner: folder.owner,
            group: folder.group,
            permissions: format!("{:o}", folder.permissions),
            modified: String::new(),
        }
    }
}

impl From<&File> for EntryRow {
    fn from(file: &File) -> Self {
        Self {
            kind: "file",
            name: file.full_name(),
            size_bytes: file.size_bytes,
            owner: file.owner,
            group: file.group,
            permissions: format!("{:o}", file.permissions),
            modified: file.last_modified.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Create a folder path.
pub async fn execute_mkdir(args: &MkdirArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let store = super::open_store(config).await?;
    let folder = store.folders.create_folder(&args.path, store.delimiter()).await?;
    let path = store.paths.folder_path(folder.id, store.delimiter()).await?;
    output::print_item(&FolderRow::new(&folder, path), format);
    Ok(())
}

/// List the direct children of a folder.
pub async fn execute_ls(args: &LsArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let store = super::open_store(config).await?;
    let folder = store.paths.resolve_folder(&args.path, store.delimiter()).await?;
    let subfolders = store.context().meta.list_subfolders(folder.id).await?;
    let files = store.context().meta.list_files(folder.id).await?;

    let rows: Vec<EntryRow> = subfolders
        .iter()
        .map(EntryRow::from)
        .chain(files.iter().map(EntryRow::from))
        .collect();
    output::print_list(&rows, format);
    Ok(())
}

/// Render a folder subtree or a single file.
pub async fn execute_tree(args: &TreeArgs, config: &AppConfig) -> AppResult<()> {
    let store = super::open_store(config).await?;
    let renderer = args.render.renderer();
    let rendered = match super::resolve_node(&store, &args.path).await? {
        Node::Folder(folder) => {
            let node = store.tree.get_folder(folder.id, true).await?;
            renderer.render_folder(&node)?
        }
        Node::File(file) => renderer.render_file(&file)?,
    };
    println!("{rendered}");
    Ok(())
}
