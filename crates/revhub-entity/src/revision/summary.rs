//! Listing projection of a revision.

use serde::{Deserialize, Serialize};

use revhub_core::types::RevisionId;

use super::model::Revision;

/// Revision metadata as returned by listings; never carries content.
///
/// Field names follow the camelCase JSON used by the web client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionSummary {
    /// Revision identifier.
    pub id: RevisionId,
    /// Logical file name.
    pub file_name: String,
    /// Declared content type.
    pub file_type: String,
    /// Uploader identity.
    pub uploaded_by: String,
    /// Role string.
    pub role: String,
    /// Project folder.
    pub project_folder: String,
    /// Creation date.
    pub upload_date: String,
    /// Signed version: positive active, negative superseded.
    pub version: i32,
    /// Sequence number (absolute version).
    pub sequence: u32,
    /// Whether this is the live revision.
    pub active: bool,
    /// Stored (compressed) size in bytes.
    pub size_bytes: u64,
}

impl From<&Revision> for RevisionSummary {
    fn from(revision: &Revision) -> Self {
        Self {
            id: revision.id,
            file_name: revision.file_name.clone(),
            file_type: revision.file_type.clone(),
            uploaded_by: revision.uploaded_by.clone(),
            role: revision.role.clone(),
            project_folder: revision.project_folder.clone(),
            upload_date: revision.upload_date.clone(),
            version: revision.state.to_signed(),
            sequence: revision.state.sequence(),
            active: revision.state.is_active(),
            size_bytes: revision.content.len() as u64,
        }
    }
}

impl From<Revision> for RevisionSummary {
    fn from(revision: Revision) -> Self {
        Self::from(&revision)
    }
}
