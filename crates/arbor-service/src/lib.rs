//! # arbor-service
//!
//! Tree services for Arbor. Each service is built from a cloned
//! [`StoreContext`] and talks to the metadata and blob stores through it.
//! [`TreeStore`] bundles all of them behind one handle.

pub mod archive;
pub mod context;
pub mod file;
pub mod folder;
pub mod render;
pub mod store;
pub mod sync;

pub use archive::{ArchivePlan, ArchiveService, ArchiveSummary};
pub use context::StoreContext;
pub use file::{DownloadService, FileService, UploadService};
pub use folder::{FolderService, NameDisambiguator, PathResolver, SizeRollup, TreeService};
pub use render::{RenderFormat, Renderer};
pub use store::TreeStore;
pub use sync::{SyncReport, SyncService};
