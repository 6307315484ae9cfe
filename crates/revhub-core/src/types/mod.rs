//! Core type definitions used across the RevHub workspace.

pub mod id;
pub mod path;

pub use id::RevisionId;
pub use path::{validate_file_name, validate_folder};
