//! File domain entities.

pub mod model;
pub mod name;

pub use model::{CreateFile, File};
pub use name::{join_file_name, split_file_name};
