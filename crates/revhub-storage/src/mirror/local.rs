//! Local filesystem mirror.

use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use revhub_core::error::{AppError, ErrorKind};
use revhub_core::result::AppResult;
use revhub_core::traits::{MirrorEntry, MirrorStore};
use revhub_core::types::{validate_file_name, validate_folder};

/// Mirror keeping `{root}/{folder}/{file_name}` on the local disk.
#[derive(Debug, Clone)]
pub struct LocalMirror {
    /// Root directory of the mirror.
    root: PathBuf,
}

impl LocalMirror {
    /// Create a mirror rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create mirror root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// The mirror root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn folder_path(&self, folder: &str) -> AppResult<PathBuf> {
        validate_folder(folder)?;
        Ok(self.root.join(folder))
    }

    fn file_path(&self, folder: &str, file_name: &str) -> AppResult<PathBuf> {
        validate_file_name(file_name)?;
        Ok(self.folder_path(folder)?.join(file_name))
    }
}

fn storage_error(action: &str, path: &Path, err: std::io::Error) -> AppError {
    AppError::with_source(
        ErrorKind::Storage,
        format!("Failed to {action}: {}", path.display()),
        err,
    )
}

#[async_trait]
impl MirrorStore for LocalMirror {
    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false))
    }

    async fn write(&self, folder: &str, file_name: &str, data: Bytes) -> AppResult<()> {
        let path = self.file_path(folder, file_name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error("create mirror directory", parent, e))?;
        }
        fs::write(&path, &data)
            .await
            .map_err(|e| storage_error("write mirror file", &path, e))?;

        debug!(folder, file_name, bytes = data.len(), "Wrote mirror file");
        Ok(())
    }

    async fn read(&self, folder: &str, file_name: &str) -> AppResult<Bytes> {
        let path = self.file_path(folder, file_name)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Err(AppError::not_found(format!(
                "Mirror file not found: {folder}/{file_name}"
            ))),
            Err(e) => Err(storage_error("read mirror file", &path, e)),
        }
    }

    async fn remove(&self, folder: &str, file_name: &str) -> AppResult<bool> {
        let path = self.file_path(folder, file_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(folder, file_name, "Removed mirror file");
                Ok(true)
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
            Err(e) => Err(storage_error("remove mirror file", &path, e)),
        }
    }

    async fn create_folder(&self, folder: &str) -> AppResult<bool> {
        let path = self.folder_path(folder)?;
        if fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false) {
            return Ok(false);
        }
        fs::create_dir_all(&path)
            .await
            .map_err(|e| storage_error("create mirror folder", &path, e))?;

        debug!(folder, "Created mirror folder");
        Ok(true)
    }

    async fn remove_folder(&self, folder: &str) -> AppResult<bool> {
        let path = self.folder_path(folder)?;
        match fs::remove_dir(&path).await {
            Ok(()) => {
                debug!(folder, "Removed mirror folder");
                Ok(true)
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
            Err(e) => Err(storage_error("remove mirror folder", &path, e)),
        }
    }

    async fn walk(&self, folder: Option<&str>) -> AppResult<Vec<MirrorEntry>> {
        let base = match folder {
            Some(folder) => self.folder_path(folder)?,
            None => self.root.clone(),
        };
        match fs::metadata(&base).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(AppError::not_found(format!(
                    "Not a folder: {}",
                    folder.unwrap_or_default()
                )));
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                return Err(AppError::not_found(format!(
                    "Folder does not exist: {}",
                    folder.unwrap_or_default()
                )));
            }
            Err(e) => return Err(storage_error("inspect mirror folder", &base, e)),
        }

        let mut entries = Vec::new();
        let mut pending = vec![(base.clone(), String::new())];
        while let Some((dir_path, prefix)) = pending.pop() {
            let mut dir = fs::read_dir(&dir_path)
                .await
                .map_err(|e| storage_error("list mirror folder", &dir_path, e))?;

            while let Some(entry) = dir
                .next_entry()
                .await
                .map_err(|e| storage_error("read mirror folder entry", &dir_path, e))?
            {
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| storage_error("inspect mirror entry", &entry.path(), e))?;
                let name = entry.file_name().to_string_lossy().into_owned();
                let path = if prefix.is_empty() {
                    name
                } else {
                    format!("{prefix}/{name}")
                };

                if file_type.is_dir() {
                    pending.push((entry.path(), path.clone()));
                }
                entries.push(MirrorEntry {
                    path,
                    is_directory: file_type.is_dir(),
                });
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}
