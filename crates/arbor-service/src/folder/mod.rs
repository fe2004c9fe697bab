//! Folder services: path resolution, naming, size rollup, retrieval, and
//! folder mutations.

pub mod naming;
pub mod resolver;
pub mod rollup;
pub mod service;
pub mod tree;

pub use naming::NameDisambiguator;
pub use resolver::PathResolver;
pub use rollup::SizeRollup;
pub use service::FolderService;
pub use tree::TreeService;
