//! Revision entity model.

use sqlx::FromRow;
use uuid::Uuid;

use revhub_core::result::AppResult;
use revhub_core::types::RevisionId;

use super::state::RevisionState;

/// One persisted upload, update, or rollback event of a file.
///
/// Everything except `state` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Unique revision identifier.
    pub id: RevisionId,
    /// Logical file name, shared by all revisions of the file.
    pub file_name: String,
    /// Declared content type.
    pub file_type: String,
    /// Caller-supplied uploader identity.
    pub uploaded_by: String,
    /// Caller-supplied role string.
    pub role: String,
    /// Project folder; with `file_name` it locates the mirror copy.
    pub project_folder: String,
    /// Compressed content.
    pub content: Vec<u8>,
    /// Creation date, `YYYY-MM-DD`.
    pub upload_date: String,
    /// Lifecycle state and sequence number.
    pub state: RevisionState,
}

impl Revision {
    /// Whether this is the live revision of its file.
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Sequence number of this revision.
    pub fn sequence(&self) -> u32 {
        self.state.sequence()
    }
}

/// Data required to insert a new, active revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRevision {
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
    /// Compressed content.
    pub content: Vec<u8>,
    /// Creation date, `YYYY-MM-DD`.
    pub upload_date: String,
    /// Sequence number the revision becomes active under.
    pub sequence: u32,
}

impl NewRevision {
    /// The state the inserted record is stored with.
    pub fn state(&self) -> AppResult<RevisionState> {
        RevisionState::active(self.sequence)
    }

    /// Materialize the record under a freshly assigned identifier.
    pub fn into_revision(self, id: RevisionId) -> AppResult<Revision> {
        let state = self.state()?;
        Ok(Revision {
            id,
            file_name: self.file_name,
            file_type: self.file_type,
            uploaded_by: self.uploaded_by,
            role: self.role,
            project_folder: self.project_folder,
            content: self.content,
            upload_date: self.upload_date,
            state,
        })
    }
}

/// A `revisions` table row.
#[derive(Debug, Clone, FromRow)]
pub struct RevisionRow {
    /// Primary key.
    pub id: Uuid,
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
    /// Compressed content.
    pub file_content: Vec<u8>,
    /// Creation date.
    pub upload_date: String,
    /// Signed version: positive active, negative superseded.
    pub version: i32,
}

impl TryFrom<RevisionRow> for Revision {
    type Error = revhub_core::AppError;

    fn try_from(row: RevisionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RevisionId::from_uuid(row.id),
            file_name: row.file_name,
            file_type: row.file_type,
            uploaded_by: row.uploaded_by,
            role: row.role,
            project_folder: row.project_folder,
            content: row.file_content,
            upload_date: row.upload_date,
            state: RevisionState::from_signed(row.version)?,
        })
    }
}
