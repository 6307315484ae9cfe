//! Read-only projections over revision state.

use bytes::Bytes;
use serde::Serialize;

use revhub_core::error::AppError;
use revhub_core::result::AppResult;
use revhub_core::types::{validate_file_name, validate_folder};
use revhub_entity::revision::{Revision, RevisionState, RevisionSummary};
use revhub_storage::codec;

use super::service::{VersioningService, parse_sequence};

/// Decompressed content of one revision plus what a client needs to save it.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    /// Logical file name.
    pub file_name: String,
    /// Declared content type.
    pub file_type: String,
    /// Sequence number of the revision served.
    pub sequence: u32,
    /// Raw content.
    pub content: Bytes,
}

impl DownloadedFile {
    fn decode(revision: &Revision) -> AppResult<Self> {
        Ok(Self {
            file_name: revision.file_name.clone(),
            file_type: revision.file_type.clone(),
            sequence: revision.sequence(),
            content: Bytes::from(codec::decompress(&revision.content)?),
        })
    }
}

/// Reachability of the engine's backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// Record store answered.
    pub store: bool,
    /// Mirror root is usable.
    pub mirror: bool,
}

impl HealthReport {
    /// Whether every backend is healthy.
    pub fn is_healthy(&self) -> bool {
        self.store && self.mirror
    }
}

fn summarize(revisions: Vec<Revision>) -> Vec<RevisionSummary> {
    revisions.iter().map(RevisionSummary::from).collect()
}

impl VersioningService {
    /// All active revisions, ordered by file name.
    pub async fn list_active(&self) -> AppResult<Vec<RevisionSummary>> {
        Ok(summarize(self.store.find_all_active().await?))
    }

    /// Superseded revisions of one file, or of every file when `None`.
    pub async fn list_history(&self, file_name: Option<&str>) -> AppResult<Vec<RevisionSummary>> {
        let revisions = match file_name {
            Some(name) => {
                validate_file_name(name)?;
                self.store.find_history(name).await?
            }
            None => self.store.find_all_history().await?,
        };
        Ok(summarize(revisions))
    }

    /// Every revision, active or superseded, in `folder`.
    pub async fn list_folder(&self, folder: &str) -> AppResult<Vec<RevisionSummary>> {
        validate_folder(folder)?;
        Ok(summarize(self.store.find_by_folder(folder).await?))
    }

    /// Content of the active revision of `file_name`.
    pub async fn download(&self, file_name: &str) -> AppResult<DownloadedFile> {
        validate_file_name(file_name)?;
        let active = self
            .store
            .find_active(file_name)
            .await?
            .ok_or_else(|| AppError::active_not_found(file_name))?;
        DownloadedFile::decode(&active)
    }

    /// Content of the revision of `file_name` with sequence `version`,
    /// whether active or superseded.
    pub async fn download_version(&self, file_name: &str, version: i64) -> AppResult<DownloadedFile> {
        validate_file_name(file_name)?;
        let sequence = parse_sequence(version)?;

        let superseded = self
            .store
            .find_by_name_and_version(file_name, RevisionState::superseded(sequence)?)
            .await?;
        let revision = match superseded {
            Some(revision) => revision,
            None => self
                .store
                .find_by_name_and_version(file_name, RevisionState::active(sequence)?)
                .await?
                .ok_or_else(|| AppError::revision_not_found(file_name, sequence as i32))?,
        };
        DownloadedFile::decode(&revision)
    }

    /// Probe the record store and the mirror.
    pub async fn health_check(&self) -> HealthReport {
        HealthReport {
            store: self.store.health_check().await.unwrap_or(false),
            mirror: self.mirror.health_check().await.unwrap_or(false),
        }
    }
}
