//! Rebuilding mirror entries from the record store.

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use revhub_core::result::AppResult;
use revhub_core::types::validate_file_name;
use revhub_storage::codec;

use super::commit::MirrorStatus;
use super::service::VersioningService;

/// One name whose mirror entry could not be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileFailure {
    /// File name.
    pub file_name: String,
    /// Why it failed.
    pub message: String,
}

/// Outcome of a full mirror reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Files rewritten from their active revision.
    pub synced: usize,
    /// Files that could not be rewritten.
    pub failed: Vec<ReconcileFailure>,
}

impl VersioningService {
    /// Rewrite the mirror file of `file_name` from its active revision.
    ///
    /// Returns `None` when the name has no active revision. Running it twice
    /// leaves the mirror in the same state.
    pub async fn reconcile(&self, file_name: &str) -> AppResult<Option<MirrorStatus>> {
        validate_file_name(file_name)?;

        let _guard = self.locks.acquire(file_name).await;
        let Some(active) = self.store.find_active(file_name).await? else {
            return Ok(None);
        };
        let content = Bytes::from(codec::decompress(&active.content)?);
        Ok(Some(self.write_mirror(&active, content).await))
    }

    /// Reconcile every file that has an active revision.
    pub async fn reconcile_all(&self) -> AppResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        for revision in self.store.find_all_active().await? {
            let outcome = self.reconcile(&revision.file_name).await;
            match outcome {
                Ok(Some(MirrorStatus::Synced)) => report.synced += 1,
                Ok(None) => {}
                Ok(Some(MirrorStatus::Failed(err))) | Err(err) => {
                    warn!(file_name = %revision.file_name, error = %err, "Reconcile failed");
                    report.failed.push(ReconcileFailure {
                        file_name: revision.file_name,
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            synced = report.synced,
            failed = report.failed.len(),
            "Mirror reconciliation finished"
        );
        Ok(report)
    }
}
