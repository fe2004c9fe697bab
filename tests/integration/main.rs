//! Integration tests for the tree store, run against the in-memory
//! metadata and blob stores.

mod archive_test;
mod helpers;
mod ingest_test;
mod mutation_test;
mod path_test;
mod sync_test;
