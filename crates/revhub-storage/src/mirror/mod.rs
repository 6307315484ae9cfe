//! Mirror store implementations.

pub mod local;

pub use local::LocalMirror;
