//! Download and archive export commands.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use arbor_core::config::AppConfig;
use arbor_core::error::AppError;
use arbor_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Arguments for `download`
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Stored file path
    pub path: String,
    /// Local directory to write into
    #[arg(default_value = ".")]
    pub dir: PathBuf,
}

/// Arguments for `export`
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Stored folder path
    pub path: String,
    /// Archive file to write (defaults to `<folder name>.zip` in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Stream entries straight into the archive instead of staging temp files
    #[arg(long)]
    pub stream: bool,
}

/// Export result row
#[derive(Debug, Serialize, Tabled)]
struct ExportRow {
    /// Archive path
    archive: String,
    /// File entries
    entries: usize,
    /// Uncompressed bytes
    bytes: u64,
}

/// Download one file.
pub async fn execute_download(args: &DownloadArgs, config: &AppConfig) -> AppResult<()> {
    let store = super::open_store(config).await?;
    let file = store.paths.resolve_file(&args.path, store.delimiter()).await?;
    let dest = store.downloads.download_into_dir(file.id, &args.dir).await?;
    output::print_success(&format!("Downloaded {} bytes to {}", file.size_bytes, dest.display()));
    Ok(())
}

/// Export a folder as a zip archive.
pub async fn execute_export(args: &ExportArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let store = super::open_store(config).await?;
    let folder = store.paths.resolve_folder(&args.path, store.delimiter()).await?;
    let dest = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.zip", folder.name)));

    let summary = if args.stream {
        let file = std::fs::File::create(&dest).map_err(|e| {
            AppError::resource(format!("Failed to create {}: {e}", dest.display()))
        })?;
        let (_, summary) = store
            .archives
            .export_to_writer(folder.id, std::io::BufWriter::new(file))
            .await?;
        summary
    } else {
        store.archives.export_to_file(folder.id, &dest).await?
    };

    let row = ExportRow {
        archive: dest.display().to_string(),
        entries: summary.entries,
        bytes: summary.bytes,
    };
    output::print_item(&row, format);
    Ok(())
}
