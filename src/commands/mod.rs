//! CLI command definitions and dispatch.

pub mod folder;
pub mod migrate;
pub mod node;
pub mod transfer;
pub mod upload;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use arbor_core::config::AppConfig;
use arbor_core::error::AppError;
use arbor_core::result::AppResult;
use arbor_database::{DatabasePool, PgMetadataStore};
use arbor_entity::file::File;
use arbor_entity::folder::Folder;
use arbor_service::TreeStore;
use arbor_storage::LocalBlobStore;

use crate::output::OutputFormat;

/// Arbor hierarchical object store
#[derive(Debug, Parser)]
#[command(name = "arbor", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Configuration environment overlay (config/{env}.toml)
    #[arg(long, env = "ARBOR_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run database migrations
    Migrate,
    /// Upload a local file or directory
    Upload(upload::UploadArgs),
    /// Merge a local directory into a stored folder
    Sync(upload::SyncArgs),
    /// Create a folder path, including missing parents
    Mkdir(folder::MkdirArgs),
    /// List a folder's subfolders and files
    Ls(folder::LsArgs),
    /// Render a folder tree or a file
    Tree(folder::TreeArgs),
    /// Rename a folder or file
    Rename(node::RenameArgs),
    /// Move a folder or file into another folder
    Mv(node::MoveArgs),
    /// Delete a folder (recursively) or file
    Rm(node::RemoveArgs),
    /// Download a file into a local directory
    Download(transfer::DownloadArgs),
    /// Export a folder as a zip archive
    Export(transfer::ExportArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        match &self.command {
            Commands::Migrate => migrate::execute(&config).await,
            Commands::Upload(args) => upload::execute_upload(args, &config, self.format).await,
            Commands::Sync(args) => upload::execute_sync(args, &config, self.format).await,
            Commands::Mkdir(args) => folder::execute_mkdir(args, &config, self.format).await,
            Commands::Ls(args) => folder::execute_ls(args, &config, self.format).await,
            Commands::Tree(args) => folder::execute_tree(args, &config).await,
            Commands::Rename(args) => node::execute_rename(args, &config).await,
            Commands::Mv(args) => node::execute_move(args, &config).await,
            Commands::Rm(args) => node::execute_remove(args, &config).await,
            Commands::Download(args) => transfer::execute_download(args, &config).await,
            Commands::Export(args) => transfer::execute_export(args, &config, self.format).await,
        }
    }
}

/// Helper: connect to the metadata store and blob store and open the tree.
pub async fn open_store(config: &AppConfig) -> AppResult<TreeStore> {
    let pool = DatabasePool::connect(&config.database).await?;
    let meta = Arc::new(PgMetadataStore::new(pool.into_pool()));
    let blobs = Arc::new(
        LocalBlobStore::new(&config.storage.blob_root, config.storage.chunk_size_bytes).await?,
    );
    TreeStore::open(meta, blobs, config).await
}

/// A stored node addressed by path.
#[derive(Debug)]
pub enum Node {
    /// A folder.
    Folder(Folder),
    /// A file.
    File(File),
}

/// Helper: resolve a path to a folder, or failing that, to a file.
pub async fn resolve_node(store: &TreeStore, path: &str) -> AppResult<Node> {
    let delimiter = store.delimiter();
    match store.paths.resolve_folder(path, delimiter).await {
        Ok(folder) => Ok(Node::Folder(folder)),
        Err(e) if e.is_not_found() => store
            .paths
            .resolve_file(path, delimiter)
            .await
            .map(Node::File)
            .map_err(|e| nothing_stored(path, e)),
        Err(e) => Err(e),
    }
}

/// Collapse a failed file lookup into one not-found error for the path.
/// Any other failure passes through unchanged.
fn nothing_stored(path: &str, err: AppError) -> AppError {
    if err.is_not_found() {
        AppError::not_found(format!("Nothing stored at '{path}'"))
    } else {
        err
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arbor_core::error::ErrorKind;
    use arbor_core::types::FolderId;
    use arbor_database::MemoryMetadataStore;
    use arbor_storage::MemoryBlobStore;

    use super::*;

    #[test]
    fn test_nothing_stored_keeps_other_errors() {
        let err = nothing_stored("a/b", AppError::file_name_not_found("b", "", FolderId::new()));
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Nothing stored at 'a/b'");

        let err = nothing_stored("a/b", AppError::database("connection reset"));
        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(err.message, "connection reset");
    }

    #[tokio::test]
    async fn test_resolve_node() {
        let store = TreeStore::open(
            Arc::new(MemoryMetadataStore::new()),
            Arc::new(MemoryBlobStore::default()),
            &AppConfig::default(),
        )
        .await
        .unwrap();
        store.folders.create_folder("docs", '/').await.unwrap();

        assert!(matches!(
            resolve_node(&store, "docs").await.unwrap(),
            Node::Folder(f) if f.name == "docs"
        ));
        let err = resolve_node(&store, "docs/missing.txt").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
