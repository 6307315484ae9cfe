//! # revhub-api
//!
//! HTTP API layer for RevHub built on Axum.
//!
//! Translates multipart uploads and path parameters into versioning engine
//! calls, maps engine errors onto status codes, and reports mirror
//! failures as warnings on otherwise successful responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::run_server;
pub use error::{ApiError, ApiResult};
pub use router::build_router;
pub use state::AppState;
