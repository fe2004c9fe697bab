//! Core type definitions used across the Arbor workspace.

pub mod id;

pub use id::*;
