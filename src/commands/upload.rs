//! Upload and sync commands.

use std::path::PathBuf;

use clap::Args;

use arbor_core::config::AppConfig;
use arbor_core::result::AppResult;
use arbor_storage::{read_local_file, read_local_tree};

use super::folder::FolderRow;
use crate::output::{self, OutputFormat};

/// Arguments for `upload`
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Local file or directory
    pub source: PathBuf,
    /// Stored destination folder path
    #[arg(short, long, default_value = "")]
    pub to: String,
}

/// Arguments for `sync`
#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Local directory
    pub source: PathBuf,
    /// Stored folder path to merge into
    pub target: String,
}

/// Upload a local file or directory tree.
pub async fn execute_upload(args: &UploadArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let store = super::open_store(config).await?;
    let destination = store
        .paths
        .resolve_folder(&args.to, store.delimiter())
        .await?;

    if tokio::fs::metadata(&args.source).await?.is_dir() {
        let local = read_local_tree(&args.source).await?;
        let folder = store.uploads.upload_folder(&local, destination.id).await?;
        let path = store.paths.folder_path(folder.id, store.delimiter()).await?;
        output::print_item(&FolderRow::new(&folder, path), format);
    } else {
        let local = read_local_file(&args.source).await?;
        let file = store.uploads.upload_file(&local, destination.id, true).await?;
        let path = store.paths.file_path(&file, store.delimiter()).await?;
        output::print_success(&format!("Uploaded {path} ({} bytes)", file.size_bytes));
    }
    Ok(())
}

/// Merge a local directory into a stored folder.
pub async fn execute_sync(args: &SyncArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let store = super::open_store(config).await?;
    let target = store
        .paths
        .resolve_folder(&args.target, store.delimiter())
        .await?;
    let local = read_local_tree(&args.source).await?;
    let report = store.sync.update_folder(target.id, &local).await?;

    match format {
        OutputFormat::Json => output::print_item(&SyncRow::from(report), format),
        OutputFormat::Table => {
            output::print_success(&format!("Synced {} into '{}'", args.source.display(), args.target));
            output::print_kv("Uploaded", &report.uploaded.to_string());
            output::print_kv("Replaced", &report.replaced.to_string());
            output::print_kv("Unchanged", &report.skipped.to_string());
            output::print_kv("Folders created", &report.folders_created.to_string());
        }
    }
    Ok(())
}

/// Sync report row
#[derive(Debug, serde::Serialize, tabled::Tabled)]
struct SyncRow {
    uploaded: usize,
    replaced: usize,
    skipped: usize,
    folders_created: usize,
}

impl From<arbor_service::SyncReport> for SyncRow {
    fn from(report: arbor_service::SyncReport) -> Self {
        Self {
            uploaded: report.uploaded,
            replaced: report.replaced,
            skipped: report.skipped,
            folders_created: report.folders_created,
        }
    }
}
