//! In-memory record store.
//!
//! Enforces the same uniqueness and version-check rules as the PostgreSQL
//! schema, so engine behaviour does not depend on the backend.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use revhub_core::error::AppError;
use revhub_core::result::AppResult;
use revhub_core::types::RevisionId;
use revhub_entity::revision::{NewRevision, Revision, RevisionState};

use crate::store::RevisionStore;

/// Process-local [`RevisionStore`] backed by a map.
#[derive(Debug, Clone, Default)]
pub struct MemoryRevisionStore {
    records: Arc<RwLock<HashMap<RevisionId, Revision>>>,
}

impl MemoryRevisionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records in any state.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_insert(
        records: &HashMap<RevisionId, Revision>,
        revision: &NewRevision,
    ) -> AppResult<()> {
        let clash = records.values().find(|r| {
            r.file_name == revision.file_name
                && (r.is_active() || r.sequence() == revision.sequence)
        });
        match clash {
            Some(existing) => Err(AppError::conflict(format!(
                "Cannot insert version {} of '{}': {} already exists",
                revision.sequence, revision.file_name, existing.state
            ))),
            None => Ok(()),
        }
    }

    fn check_supersede(
        records: &HashMap<RevisionId, Revision>,
        revision: &Revision,
    ) -> AppResult<RevisionState> {
        let next = revision.state.supersede()?;
        let stored = records
            .get(&revision.id)
            .ok_or_else(|| AppError::conflict(format!("Revision {} no longer exists", revision.id)))?;
        if stored.state != revision.state {
            return Err(AppError::conflict(format!(
                "Revision {} of '{}' changed concurrently: expected {}, found {}",
                revision.id, revision.file_name, revision.state, stored.state
            )));
        }
        Ok(next)
    }

    fn apply_insert(
        records: &mut HashMap<RevisionId, Revision>,
        revision: NewRevision,
    ) -> AppResult<Revision> {
        let id = RevisionId::new();
        let stored = revision.into_revision(id)?;
        records.insert(id, stored.clone());
        debug!(file_name = %stored.file_name, version = stored.sequence(), "Inserted revision");
        Ok(stored)
    }

    async fn collect<F>(&self, predicate: F) -> Vec<Revision>
    where
        F: Fn(&Revision) -> bool,
    {
        let records = self.records.read().await;
        let mut matched: Vec<Revision> = records.values().filter(|r| predicate(r)).cloned().collect();
        matched.sort_by(|a, b| {
            a.file_name
                .cmp(&b.file_name)
                .then(a.sequence().cmp(&b.sequence()))
        });
        matched
    }

    async fn remove_where<F>(&self, predicate: F) -> u64
    where
        F: Fn(&Revision) -> bool,
    {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| !predicate(r));
        (before - records.len()) as u64
    }
}

#[async_trait]
impl RevisionStore for MemoryRevisionStore {
    async fn find_active(&self, file_name: &str) -> AppResult<Option<Revision>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.file_name == file_name && r.is_active())
            .cloned())
    }

    async fn find_by_name_and_version(
        &self,
        file_name: &str,
        state: RevisionState,
    ) -> AppResult<Option<Revision>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.file_name == file_name && r.state == state)
            .cloned())
    }

    async fn find_history(&self, file_name: &str) -> AppResult<Vec<Revision>> {
        Ok(self
            .collect(|r| r.file_name == file_name && !r.is_active())
            .await)
    }

    async fn find_all_active(&self) -> AppResult<Vec<Revision>> {
        Ok(self.collect(|r| r.is_active()).await)
    }

    async fn find_all_history(&self) -> AppResult<Vec<Revision>> {
        Ok(self.collect(|r| !r.is_active()).await)
    }

    async fn find_by_folder(&self, folder: &str) -> AppResult<Vec<Revision>> {
        Ok(self.collect(|r| r.project_folder == folder).await)
    }

    async fn insert(&self, revision: NewRevision) -> AppResult<Revision> {
        let mut records = self.records.write().await;
        Self::check_insert(&records, &revision)?;
        Self::apply_insert(&mut records, revision)
    }

    async fn supersede(&self, revision: &Revision) -> AppResult<Revision> {
        let mut records = self.records.write().await;
        let next = Self::check_supersede(&records, revision)?;
        let mut updated = revision.clone();
        updated.state = next;
        records.insert(revision.id, updated.clone());
        Ok(updated)
    }

    async fn commit_successor(
        &self,
        current: Option<&Revision>,
        next: NewRevision,
    ) -> AppResult<Revision> {
        let mut records = self.records.write().await;

        // Validate both steps against a view where `current` is already
        // superseded, then apply. Nothing is written on failure.
        let superseded = match current {
            Some(current) => {
                let state = Self::check_supersede(&records, current)?;
                let mut updated = current.clone();
                updated.state = state;
                Some(updated)
            }
            None => None,
        };
        let clash = records.values().find(|r| {
            let state = match &superseded {
                Some(s) if s.id == r.id => s.state,
                _ => r.state,
            };
            r.file_name == next.file_name
                && (state.is_active() || state.sequence() == next.sequence)
        });
        if let Some(existing) = clash {
            return Err(AppError::conflict(format!(
                "Cannot insert version {} of '{}': {} already exists",
                next.sequence, next.file_name, existing.state
            )));
        }

        if let Some(updated) = superseded {
            records.insert(updated.id, updated);
        }
        Self::apply_insert(&mut records, next)
    }

    async fn delete_by_id(&self, id: RevisionId) -> AppResult<bool> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn delete_by_name(&self, file_name: &str) -> AppResult<u64> {
        Ok(self.remove_where(|r| r.file_name == file_name).await)
    }

    async fn delete_by_folder(&self, folder: &str) -> AppResult<u64> {
        Ok(self.remove_where(|r| r.project_folder == folder).await)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revhub_core::error::ErrorKind;

    fn new_revision(file_name: &str, folder: &str, sequence: u32) -> NewRevision {
        NewRevision {
            file_name: file_name.to_string(),
            file_type: "text/plain".to_string(),
            uploaded_by: "alice".to_string(),
            role: "developer".to_string(),
            project_folder: folder.to_string(),
            content: vec![sequence as u8],
            upload_date: "2026-01-01".to_string(),
            sequence,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_active() {
        let store = MemoryRevisionStore::new();
        let inserted = store.insert(new_revision("a.txt", "p", 1)).await.unwrap();
        assert_eq!(inserted.state, RevisionState::Active(1));

        let active = store.find_active("a.txt").await.unwrap().unwrap();
        assert_eq!(active.id, inserted.id);
        assert!(store.find_active("b.txt").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_active_is_rejected() {
        let store = MemoryRevisionStore::new();
        store.insert(new_revision("a.txt", "p", 1)).await.unwrap();
        let err = store.insert(new_revision("a.txt", "p", 2)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_reused_sequence_is_rejected() {
        let store = MemoryRevisionStore::new();
        let first = store.insert(new_revision("a.txt", "p", 1)).await.unwrap();
        store.supersede(&first).await.unwrap();
        let err = store.insert(new_revision("a.txt", "p", 1)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_supersede_checks_stored_state() {
        let store = MemoryRevisionStore::new();
        let first = store.insert(new_revision("a.txt", "p", 1)).await.unwrap();

        let superseded = store.supersede(&first).await.unwrap();
        assert_eq!(superseded.state, RevisionState::Superseded(1));

        // A second writer still holding the stale Active(1) view loses.
        let err = store.supersede(&first).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_history_and_exact_lookup() {
        let store = MemoryRevisionStore::new();
        let v1 = store.insert(new_revision("a.txt", "p", 1)).await.unwrap();
        store.supersede(&v1).await.unwrap();
        store.insert(new_revision("a.txt", "p", 2)).await.unwrap();

        let history = store.find_history("a.txt").await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].state, RevisionState::Superseded(1));

        assert!(store
            .find_by_name_and_version("a.txt", RevisionState::Superseded(1))
            .await
            .unwrap()
            .is_some());
        assert!(store
            .find_by_name_and_version("a.txt", RevisionState::Active(1))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_scans_are_ordered() {
        let store = MemoryRevisionStore::new();
        store.insert(new_revision("b.txt", "p", 1)).await.unwrap();
        store.insert(new_revision("a.txt", "q", 1)).await.unwrap();

        let active = store.find_all_active().await.unwrap();
        let names: Vec<&str> = active.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert!(store.find_all_history().await.unwrap().is_empty());
        assert_eq!(store.find_by_folder("q").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deletes() {
        let store = MemoryRevisionStore::new();
        let v1 = store.insert(new_revision("a.txt", "p", 1)).await.unwrap();
        store.supersede(&v1).await.unwrap();
        let v2 = store.insert(new_revision("a.txt", "p", 2)).await.unwrap();
        store.insert(new_revision("b.txt", "q", 1)).await.unwrap();

        assert!(store.delete_by_id(v2.id).await.unwrap());
        assert!(!store.delete_by_id(v2.id).await.unwrap());
        assert_eq!(store.delete_by_name("a.txt").await.unwrap(), 1);
        assert_eq!(store.delete_by_folder("q").await.unwrap(), 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_commit_successor_is_all_or_nothing() {
        let store = MemoryRevisionStore::new();
        let v1 = store.insert(new_revision("a.txt", "p", 1)).await.unwrap();

        let v2 = store
            .commit_successor(Some(&v1), new_revision("a.txt", "p", 2))
            .await
            .unwrap();
        assert_eq!(v2.state, RevisionState::Active(2));

        // Reusing sequence 1 fails, and the stale supersede is not applied.
        let err = store
            .commit_successor(Some(&v2), new_revision("a.txt", "p", 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        let active = store.find_active("a.txt").await.unwrap().unwrap();
        assert_eq!(active.id, v2.id);
        assert_eq!(store.find_history("a.txt").await.unwrap().len(), 1);
    }
}
