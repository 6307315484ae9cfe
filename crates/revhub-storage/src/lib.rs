//! # revhub-storage
//!
//! The payload codec applied to revision content before it reaches the
//! record store, and the local filesystem mirror of active revisions.

pub mod codec;
pub mod mirror;

pub use mirror::LocalMirror;
