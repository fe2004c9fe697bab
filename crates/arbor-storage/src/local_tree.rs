//! Reading a local directory into a [`LocalFolder`] snapshot.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use tokio::fs;
use tracing::debug;

use arbor_core::error::{AppError, ErrorKind};
use arbor_core::result::AppResult;
use arbor_entity::file::split_file_name;
use arbor_entity::local::{LocalFile, LocalFolder};

/// Read the directory at `path` and everything below it.
///
/// Symlinks and other special entries are skipped. Entries are sorted by
/// name so the snapshot is deterministic.
pub async fn read_local_tree(path: &Path) -> AppResult<LocalFolder> {
    let absolute = fs::canonicalize(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found(format!("Local directory not found: {}", path.display()))
        } else {
            AppError::with_source(
                ErrorKind::Resource,
                format!("Failed to resolve local path: {}", path.display()),
                e,
            )
        }
    })?;
    let meta = metadata(&absolute).await?;
    if !meta.is_dir() {
        return Err(AppError::invalid_argument(format!(
            "Not a directory: {}",
            absolute.display()
        )));
    }
    let folder = read_dir(absolute, meta).await?;
    debug!(
        path = %folder.absolute_path.display(),
        bytes = folder.size_bytes(),
        "Read local tree"
    );
    Ok(folder)
}

/// Read a single regular file at `path`.
pub async fn read_local_file(path: &Path) -> AppResult<LocalFile> {
    let absolute = fs::canonicalize(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::not_found(format!("Local file not found: {}", path.display()))
        } else {
            AppError::with_source(
                ErrorKind::Resource,
                format!("Failed to resolve local path: {}", path.display()),
                e,
            )
        }
    })?;
    let meta = metadata(&absolute).await?;
    if !meta.is_file() {
        return Err(AppError::invalid_argument(format!(
            "Not a regular file: {}",
            absolute.display()
        )));
    }
    Ok(local_file(absolute, &meta))
}

fn read_dir(path: PathBuf, meta: Metadata) -> BoxFuture<'static, AppResult<LocalFolder>> {
    Box::pin(async move {
        let (owner, group, permissions) = ownership(&meta);
        let mut folder = LocalFolder {
            name: entry_name(&path),
            owner,
            group,
            permissions,
            last_modified: modified(&meta),
            absolute_path: path.clone(),
            files: Vec::new(),
            subfolders: Vec::new(),
        };

        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Resource,
                format!("Failed to list directory: {}", path.display()),
                e,
            )
        })?;
        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Resource, "Failed to read directory entry", e)
        })? {
            entries.push(entry.path());
        }
        entries.sort();

        for entry_path in entries {
            let entry_meta = fs::symlink_metadata(&entry_path).await.map_err(|e| {
                AppError::with_source(ErrorKind::Resource, "Failed to get entry metadata", e)
            })?;
            if entry_meta.is_dir() {
                folder.add_subfolder(read_dir(entry_path, entry_meta).await?);
            } else if entry_meta.is_file() {
                folder.add_file(local_file(entry_path, &entry_meta));
            }
        }
        Ok(folder)
    })
}

fn local_file(path: PathBuf, meta: &Metadata) -> LocalFile {
    let file_name = entry_name(&path);
    let (name, extension) = split_file_name(&file_name);
    let (owner, group, permissions) = ownership(meta);
    LocalFile {
        name: name.to_string(),
        extension: extension.to_string(),
        owner,
        group,
        permissions,
        last_modified: modified(meta),
        size_bytes: meta.len(),
        absolute_path: path,
    }
}

async fn metadata(path: &Path) -> AppResult<Metadata> {
    fs::metadata(path).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Resource,
            format!("Failed to get metadata: {}", path.display()),
            e,
        )
    })
}

fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn modified(meta: &Metadata) -> DateTime<Utc> {
    meta.modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(unix)]
fn ownership(meta: &Metadata) -> (i64, i64, i32) {
    use std::os::unix::fs::MetadataExt;
    (
        i64::from(meta.uid()),
        i64::from(meta.gid()),
        (meta.mode() & 0o7777) as i32,
    )
}

#[cfg(not(unix))]
fn ownership(meta: &Metadata) -> (i64, i64, i32) {
    let permissions = if meta.permissions().readonly() { 0o444 } else { 0o644 };
    (0, 0, permissions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_nested_tree() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("docs");
        std::fs::create_dir_all(root.join("img")).unwrap();
        std::fs::write(root.join("readme.txt"), b"hello").unwrap();
        std::fs::write(root.join("img").join("logo.png"), b"png!!!").unwrap();
        std::fs::write(root.join("Makefile"), b"all:").unwrap();

        let tree = read_local_tree(&root).await.unwrap();
        assert_eq!(tree.name, "docs");
        assert_eq!(tree.files.len(), 2);
        assert_eq!(tree.size_bytes(), 15);

        let makefile = tree.files.iter().find(|f| f.name == "Makefile").unwrap();
        assert_eq!(makefile.extension, "");
        let readme = tree.files.iter().find(|f| f.name == "readme").unwrap();
        assert_eq!(readme.extension, "txt");
        assert_eq!(readme.size_bytes, 5);

        assert_eq!(tree.subfolders.len(), 1);
        let img = &tree.subfolders[0];
        assert_eq!(img.name, "img");
        assert_eq!(img.files[0].name, "logo");
        assert_eq!(img.files[0].extension, "png");
    }

    #[tokio::test]
    async fn test_reads_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.tar.gz");
        std::fs::write(&path, b"1234").unwrap();

        let file = read_local_file(&path).await.unwrap();
        assert_eq!(file.name, "archive.tar");
        assert_eq!(file.extension, "gz");
        assert_eq!(file.size_bytes, 4);

        let err = read_local_file(dir.path()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_rejects_missing_and_non_directories() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_local_tree(&dir.path().join("missing")).await.unwrap_err();
        assert!(err.is_not_found());

        let file = dir.path().join("plain.txt");
        std::fs::write(&file, b"x").unwrap();
        let err = read_local_tree(&file).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }
}
