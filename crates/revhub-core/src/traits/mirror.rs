//! Mirror storage trait for the on-disk copy of active revisions.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// One entry returned by a mirror tree walk.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MirrorEntry {
    /// `/`-separated path relative to the walked directory.
    pub path: String,
    /// Whether this entry is a directory.
    pub is_directory: bool,
}

/// Backend holding the raw bytes of every active revision at
/// `{folder}/{file_name}` under a single root.
///
/// The mirror is derived data: the record store stays authoritative and
/// every entry can be rewritten from it at any time.
#[async_trait]
pub trait MirrorStore: Send + Sync + std::fmt::Debug + 'static {
    /// Check whether the mirror root is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write a file, creating missing parent directories.
    async fn write(&self, folder: &str, file_name: &str, data: Bytes) -> AppResult<()>;

    /// Read a file back from the mirror.
    async fn read(&self, folder: &str, file_name: &str) -> AppResult<Bytes>;

    /// Remove a file. Returns `false` if it did not exist.
    async fn remove(&self, folder: &str, file_name: &str) -> AppResult<bool>;

    /// Create a folder. Returns `false` if it already existed.
    async fn create_folder(&self, folder: &str) -> AppResult<bool>;

    /// Remove an empty folder. Returns `false` if it did not exist.
    async fn remove_folder(&self, folder: &str) -> AppResult<bool>;

    /// Recursively list everything below `folder` (or the root when `None`).
    async fn walk(&self, folder: Option<&str>) -> AppResult<Vec<MirrorEntry>>;
}
