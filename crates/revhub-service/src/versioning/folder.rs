//! Project folder operations.

use tracing::info;

use revhub_core::error::AppError;
use revhub_core::result::AppResult;
use revhub_core::types::validate_folder;

use super::service::VersioningService;

impl VersioningService {
    /// Create `folder` in the mirror. Returns `false` if it already existed.
    pub async fn create_folder(&self, folder: &str) -> AppResult<bool> {
        validate_folder(folder)?;
        let created = self.mirror.create_folder(folder).await?;
        if created {
            info!(folder, "Folder created");
        }
        Ok(created)
    }

    /// Delete `folder`, which must not be referenced by any revision.
    ///
    /// Returns `false` if there was no mirror directory to remove.
    pub async fn delete_folder(&self, folder: &str) -> AppResult<bool> {
        validate_folder(folder)?;

        let referencing = self.store.find_by_folder(folder).await?;
        if !referencing.is_empty() {
            return Err(AppError::folder_not_empty(folder, referencing.len()));
        }

        self.store.delete_by_folder(folder).await?;
        let removed = self.mirror.remove_folder(folder).await?;
        info!(folder, removed, "Folder deleted");
        Ok(removed)
    }

    /// Mirror paths below `folder` (or the root), relative to it.
    pub async fn list_mirror_tree(&self, folder: Option<&str>) -> AppResult<Vec<String>> {
        if let Some(folder) = folder {
            validate_folder(folder)?;
        }
        Ok(self
            .mirror
            .walk(folder)
            .await?
            .into_iter()
            .map(|entry| entry.path)
            .collect())
    }

    /// Every directory in the mirror, relative to the root.
    pub async fn list_mirror_folders(&self) -> AppResult<Vec<String>> {
        Ok(self
            .mirror
            .walk(None)
            .await?
            .into_iter()
            .filter(|entry| entry.is_directory)
            .map(|entry| entry.path)
            .collect())
    }
}
