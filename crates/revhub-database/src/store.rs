//! Record store trait for revision persistence.

use async_trait::async_trait;

use revhub_core::result::AppResult;
use revhub_core::types::RevisionId;
use revhub_entity::revision::{NewRevision, Revision, RevisionState};

/// Durable table of revision records; the source of truth for the engine.
///
/// Records are immutable apart from one transition, `Active(n)` to
/// `Superseded(n)`, performed by [`RevisionStore::supersede`]. Name-scoped
/// lists are ordered by ascending sequence number, store-wide lists by
/// file name then sequence number.
#[async_trait]
pub trait RevisionStore: Send + Sync + std::fmt::Debug + 'static {
    /// The unique active revision of `file_name`, if any.
    async fn find_active(&self, file_name: &str) -> AppResult<Option<Revision>>;

    /// Exact lookup by name and state, sign included.
    async fn find_by_name_and_version(
        &self,
        file_name: &str,
        state: RevisionState,
    ) -> AppResult<Option<Revision>>;

    /// All superseded revisions of `file_name`.
    async fn find_history(&self, file_name: &str) -> AppResult<Vec<Revision>>;

    /// Every active revision in the store.
    async fn find_all_active(&self) -> AppResult<Vec<Revision>>;

    /// Every superseded revision in the store.
    async fn find_all_history(&self) -> AppResult<Vec<Revision>>;

    /// Every revision, in any state, whose project folder is `folder`.
    async fn find_by_folder(&self, folder: &str) -> AppResult<Vec<Revision>>;

    /// Insert a new active revision and assign its identifier.
    ///
    /// Fails with `Conflict` if the name already has an active revision
    /// or already used the sequence number.
    async fn insert(&self, revision: NewRevision) -> AppResult<Revision>;

    /// Retag an active revision as superseded, in place.
    ///
    /// The write only applies while the stored state still equals
    /// `revision.state`; a concurrent change yields `Conflict`.
    async fn supersede(&self, revision: &Revision) -> AppResult<Revision>;

    /// Supersede `current` (when given) and insert `next` as one unit.
    ///
    /// Either both writes persist or neither does. Implementations with
    /// transactions should override the default, which runs the two
    /// steps back to back.
    async fn commit_successor(
        &self,
        current: Option<&Revision>,
        next: NewRevision,
    ) -> AppResult<Revision> {
        if let Some(current) = current {
            self.supersede(current).await?;
        }
        self.insert(next).await
    }

    /// Delete one record. Returns `true` if it existed.
    async fn delete_by_id(&self, id: RevisionId) -> AppResult<bool>;

    /// Delete every record of a file name. Returns the number removed.
    async fn delete_by_name(&self, file_name: &str) -> AppResult<u64>;

    /// Delete every record in a folder. Returns the number removed.
    async fn delete_by_folder(&self, folder: &str) -> AppResult<u64>;

    /// Check store connectivity.
    async fn health_check(&self) -> AppResult<bool>;
}
