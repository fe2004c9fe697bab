//! # arbor-entity
//!
//! Domain entity models for Arbor. `Folder` and `File` are metadata store
//! rows and derive `sqlx::FromRow`; `FolderNode` is a retrieved tree and
//! `LocalFolder`/`LocalFile` describe an external tree on disk.

pub mod file;
pub mod folder;
pub mod local;
