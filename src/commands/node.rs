//! Rename, move, and delete commands for folders and files.

use clap::Args;

use arbor_core::config::AppConfig;
use arbor_core::result::AppResult;
use arbor_entity::file::split_file_name;

use super::Node;
use crate::output;

/// Arguments for `rename`
#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Stored folder or file path
    pub path: String,
    /// New name; for files, the extension follows the last '.'
    pub name: String,
}

/// Arguments for `mv`
#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Stored folder or file path
    pub path: String,
    /// Destination folder path
    pub destination: String,
}

/// Arguments for `rm`
#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Stored folder or file path
    pub path: String,
}

/// Rename a folder or file.
pub async fn execute_rename(args: &RenameArgs, config: &AppConfig) -> AppResult<()> {
    let store = super::open_store(config).await?;
    match super::resolve_node(&store, &args.path).await? {
        Node::Folder(folder) => {
            let renamed = store.folders.rename_folder(folder.id, &args.name).await?;
            output::print_success(&format!("Renamed folder '{}' to '{}'", folder.name, renamed.name));
        }
        Node::File(file) => {
            let (name, extension) = split_file_name(&args.name);
            let renamed = store.files.rename_file(file.id, name, extension).await?;
            output::print_success(&format!(
                "Renamed file '{}' to '{}'",
                file.full_name(),
                renamed.full_name()
            ));
        }
    }
    Ok(())
}

/// Move a folder or file.
pub async fn execute_move(args: &MoveArgs, config: &AppConfig) -> AppResult<()> {
    let store = super::open_store(config).await?;
    let destination = store
        .paths
        .resolve_folder(&args.destination, store.delimiter())
        .await?;
    match super::resolve_node(&store, &args.path).await? {
        Node::Folder(folder) => {
            let moved = store.folders.move_folder(folder.id, destination.id).await?;
            let path = store.paths.folder_path(moved.id, store.delimiter()).await?;
            output::print_success(&format!("Moved folder to '{path}'"));
        }
        Node::File(file) => {
            let moved = store.files.move_file(file.id, destination.id).await?;
            let path = store.paths.file_path(&moved, store.delimiter()).await?;
            output::print_success(&format!("Moved file to '{path}'"));
        }
    }
    Ok(())
}

/// Delete a folder subtree or a file.
pub async fn execute_remove(args: &RemoveArgs, config: &AppConfig) -> AppResult<()> {
    let store = super::open_store(config).await?;
    match super::resolve_node(&store, &args.path).await? {
        Node::Folder(folder) => {
            store.folders.delete_folder(folder.id).await?;
            output::print_success(&format!("Deleted folder '{}'", args.path));
        }
        Node::File(file) => {
            store.files.delete_file(file.id).await?;
            output::print_success(&format!("Deleted file '{}'", args.path));
        }
    }
    Ok(())
}
