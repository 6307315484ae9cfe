//! Revision lifecycle: upload, update, rollback, delete.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use revhub_core::error::{AppError, ErrorKind};
use revhub_core::result::AppResult;
use revhub_core::traits::MirrorStore;
use revhub_core::types::{validate_file_name, validate_folder};
use revhub_database::RevisionStore;
use revhub_entity::revision::{NewRevision, Revision, RevisionState};
use revhub_storage::codec;

use super::commit::{Committed, MirrorStatus};
use crate::lock::NameLocks;

/// Input of a first upload or a re-upload of a file.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Logical file name.
    pub file_name: String,
    /// Declared content type.
    pub file_type: String,
    /// Uploader identity.
    pub uploaded_by: String,
    /// Uploader role.
    pub role: String,
    /// Project folder the file belongs to.
    pub folder: String,
    /// Raw, uncompressed content.
    pub content: Bytes,
}

/// Input of an update to an existing file.
///
/// Type and role are carried over from the revision being replaced.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    /// Logical file name.
    pub file_name: String,
    /// Uploader identity.
    pub uploaded_by: String,
    /// Project folder the new revision belongs to.
    pub folder: String,
    /// Raw, uncompressed content.
    pub content: Bytes,
}

/// The versioning engine.
///
/// Holds no revision state of its own. Mutations of one file name are
/// serialized through [`NameLocks`]; the store's version-checked writes
/// catch writers outside this process.
#[derive(Debug, Clone)]
pub struct VersioningService {
    /// Authoritative revision records.
    pub(crate) store: Arc<dyn RevisionStore>,
    /// Filesystem copy of active content.
    pub(crate) mirror: Arc<dyn MirrorStore>,
    /// Per-name locks.
    pub(crate) locks: Arc<NameLocks>,
}

impl VersioningService {
    /// Creates a new versioning service.
    pub fn new(store: Arc<dyn RevisionStore>, mirror: Arc<dyn MirrorStore>) -> Self {
        Self {
            store,
            mirror,
            locks: Arc::new(NameLocks::new()),
        }
    }

    /// Store a new revision of `file_name`, superseding the active one if
    /// there is one.
    pub async fn upload(&self, req: UploadRequest) -> AppResult<Committed<Revision>> {
        validate_file_name(&req.file_name)?;
        validate_folder(&req.folder)?;

        let _guard = self.locks.acquire(&req.file_name).await;
        let current = self.store.find_active(&req.file_name).await?;
        let sequence = self.next_sequence(&req.file_name, current.as_ref()).await?;

        let next = NewRevision {
            file_name: req.file_name,
            file_type: req.file_type,
            uploaded_by: req.uploaded_by,
            role: req.role,
            project_folder: req.folder,
            content: codec::compress(&req.content),
            upload_date: today(),
            sequence,
        };
        let revision = self.store.commit_successor(current.as_ref(), next).await?;

        info!(
            file_name = %revision.file_name,
            version = revision.sequence(),
            folder = %revision.project_folder,
            uploaded_by = %revision.uploaded_by,
            "File uploaded"
        );

        let mirror = self
            .replace_mirror(current.as_ref(), &revision, req.content)
            .await;
        Ok(Committed::new(revision, mirror))
    }

    /// Store new content for a file that already has an active revision.
    pub async fn update(&self, req: UpdateRequest) -> AppResult<Committed<Revision>> {
        validate_file_name(&req.file_name)?;
        validate_folder(&req.folder)?;

        let _guard = self.locks.acquire(&req.file_name).await;
        let current = self
            .store
            .find_active(&req.file_name)
            .await?
            .ok_or_else(|| AppError::active_not_found(&req.file_name))?;

        let next = NewRevision {
            file_name: req.file_name,
            file_type: current.file_type.clone(),
            uploaded_by: req.uploaded_by,
            role: current.role.clone(),
            project_folder: req.folder,
            content: codec::compress(&req.content),
            upload_date: today(),
            sequence: current.state.successor()?.sequence(),
        };
        let revision = self.store.commit_successor(Some(&current), next).await?;

        info!(
            file_name = %revision.file_name,
            version = revision.sequence(),
            previous = current.sequence(),
            folder = %revision.project_folder,
            "File updated"
        );

        let mirror = self
            .replace_mirror(Some(&current), &revision, req.content)
            .await;
        Ok(Committed::new(revision, mirror))
    }

    /// Make the content of revision `version` active again under a new
    /// sequence number.
    ///
    /// `version` is the positive sequence number. It may name a superseded
    /// revision or the active one. Nothing is written if it names neither.
    pub async fn rollback(&self, file_name: &str, version: i64) -> AppResult<Committed<Revision>> {
        validate_file_name(file_name)?;
        let target_sequence = parse_sequence(version)?;

        let _guard = self.locks.acquire(file_name).await;
        let current = self.store.find_active(file_name).await?;

        let target = match &current {
            Some(active) if active.sequence() == target_sequence => active.clone(),
            _ => self
                .store
                .find_by_name_and_version(file_name, RevisionState::superseded(target_sequence)?)
                .await?
                .ok_or_else(|| AppError::revision_not_found(file_name, target_sequence as i32))?,
        };
        let restored = Bytes::from(codec::decompress(&target.content)?);

        let sequence = self.next_sequence(file_name, current.as_ref()).await?;
        let folder = current
            .as_ref()
            .map_or_else(|| target.project_folder.clone(), |c| c.project_folder.clone());

        let next = NewRevision {
            file_name: file_name.to_owned(),
            file_type: target.file_type.clone(),
            uploaded_by: target.uploaded_by.clone(),
            role: target.role.clone(),
            project_folder: folder,
            content: target.content.clone(),
            upload_date: today(),
            sequence,
        };
        let revision = self.store.commit_successor(current.as_ref(), next).await?;

        info!(
            file_name = %revision.file_name,
            version = revision.sequence(),
            restored_from = target_sequence,
            folder = %revision.project_folder,
            "File rolled back"
        );

        let mirror = self
            .replace_mirror(current.as_ref(), &revision, restored)
            .await;
        Ok(Committed::new(revision, mirror))
    }

    /// Delete the active revision of `file_name` and its mirror file.
    ///
    /// Superseded revisions are kept. Returns `None` if nothing was active.
    pub async fn delete(&self, file_name: &str) -> AppResult<Committed<Option<Revision>>> {
        validate_file_name(file_name)?;

        let _guard = self.locks.acquire(file_name).await;
        let Some(active) = self.store.find_active(file_name).await? else {
            return Ok(Committed::synced(None));
        };
        if !self.store.delete_by_id(active.id).await? {
            return Err(AppError::conflict(format!(
                "Active revision of '{file_name}' was removed concurrently"
            )));
        }

        info!(
            file_name,
            version = active.sequence(),
            folder = %active.project_folder,
            "File deleted"
        );

        let mirror = self.remove_mirror(&active).await;
        Ok(Committed::new(Some(active), mirror))
    }

    /// The sequence number the next revision of `file_name` gets.
    ///
    /// The active revision always carries the highest sequence. Without one,
    /// numbering continues after the newest superseded revision.
    pub(crate) async fn next_sequence(
        &self,
        file_name: &str,
        current: Option<&Revision>,
    ) -> AppResult<u32> {
        if let Some(current) = current {
            return Ok(current.state.successor()?.sequence());
        }
        let newest = self
            .store
            .find_history(file_name)
            .await?
            .iter()
            .map(Revision::sequence)
            .max();
        match newest {
            Some(n) => Ok(RevisionState::Active(n).successor()?.sequence()),
            None => Ok(RevisionState::FIRST.sequence()),
        }
    }

    /// Point the mirror at `revision`, dropping the previous revision's file
    /// when it lived in another folder.
    async fn replace_mirror(
        &self,
        previous: Option<&Revision>,
        revision: &Revision,
        content: Bytes,
    ) -> MirrorStatus {
        let status = self.write_mirror(revision, content).await;
        if let Some(previous) = previous {
            if previous.project_folder != revision.project_folder {
                if let MirrorStatus::Failed(err) = self.remove_mirror(previous).await {
                    return MirrorStatus::Failed(err);
                }
            }
        }
        status
    }

    pub(crate) async fn write_mirror(&self, revision: &Revision, content: Bytes) -> MirrorStatus {
        match self
            .mirror
            .write(&revision.project_folder, &revision.file_name, content)
            .await
        {
            Ok(()) => MirrorStatus::Synced,
            Err(err) => {
                warn!(
                    file_name = %revision.file_name,
                    folder = %revision.project_folder,
                    error = %err,
                    "Mirror write failed; record stays committed"
                );
                MirrorStatus::Failed(AppError::with_source(
                    ErrorKind::MirrorWriteFailed,
                    format!(
                        "Failed to mirror {}/{}",
                        revision.project_folder, revision.file_name
                    ),
                    err,
                ))
            }
        }
    }

    async fn remove_mirror(&self, revision: &Revision) -> MirrorStatus {
        match self
            .mirror
            .remove(&revision.project_folder, &revision.file_name)
            .await
        {
            Ok(_) => MirrorStatus::Synced,
            Err(err) => {
                warn!(
                    file_name = %revision.file_name,
                    folder = %revision.project_folder,
                    error = %err,
                    "Mirror removal failed"
                );
                MirrorStatus::Failed(AppError::with_source(
                    ErrorKind::MirrorWriteFailed,
                    format!(
                        "Failed to remove mirror file {}/{}",
                        revision.project_folder, revision.file_name
                    ),
                    err,
                ))
            }
        }
    }
}

/// Check a caller-supplied sequence number.
pub(crate) fn parse_sequence(version: i64) -> AppResult<u32> {
    if version < 1 || version > i64::from(i32::MAX) {
        return Err(AppError::validation(format!(
            "Version must be between 1 and {}, got {version}",
            i32::MAX
        )));
    }
    Ok(version as u32)
}

/// Today's date as stored in `upload_date`.
fn today() -> String {
    chrono::Local::now().date_naive().to_string()
}
