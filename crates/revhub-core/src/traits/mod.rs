//! Core traits defined in `revhub-core` and implemented by other crates.

pub mod mirror;

pub use mirror::{MirrorEntry, MirrorStore};
