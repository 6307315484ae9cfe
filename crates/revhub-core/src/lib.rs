//! # revhub-core
//!
//! Core crate for RevHub. Contains the unified error system, configuration
//! schemas, typed identifiers, path validation, and the mirror storage trait.
//!
//! This crate has **no** internal dependencies on other RevHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
