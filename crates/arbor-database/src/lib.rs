//! # arbor-database
//!
//! The [`MetadataStore`] boundary for folder and file records, with a
//! PostgreSQL implementation and an in-memory one.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryMetadataStore;
pub use repositories::PgMetadataStore;
pub use store::MetadataStore;
