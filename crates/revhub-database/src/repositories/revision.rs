//! Revision repository implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use revhub_core::error::{AppError, ErrorKind};
use revhub_core::result::AppResult;
use revhub_core::types::RevisionId;
use revhub_entity::revision::{NewRevision, Revision, RevisionRow, RevisionState};

use crate::store::RevisionStore;

const COLUMNS: &str = "id, file_name, file_type, uploaded_by, role, project_folder, \
                       file_content, upload_date, version";

/// PostgreSQL-backed [`RevisionStore`] over the `revisions` table.
///
/// The schema carries a partial unique index allowing one positive
/// version per file name and a unique index on `(file_name, abs(version))`.
#[derive(Debug, Clone)]
pub struct PgRevisionRepository {
    pool: PgPool,
}

impl PgRevisionRepository {
    /// Create a new revision repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_list(&self, sql: &str, bind: Option<&str>) -> AppResult<Vec<Revision>> {
        let mut query = sqlx::query_as::<_, RevisionRow>(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list revisions", e))?
            .into_iter()
            .map(Revision::try_from)
            .collect()
    }

    async fn supersede_in(
        tx: &mut Transaction<'_, Postgres>,
        revision: &Revision,
    ) -> AppResult<Revision> {
        let next = revision.state.supersede()?;
        let row = sqlx::query_as::<_, RevisionRow>(&format!(
            "UPDATE revisions SET version = $3 WHERE id = $1 AND version = $2 RETURNING {COLUMNS}"
        ))
        .bind(revision.id.into_uuid())
        .bind(revision.state.to_signed())
        .bind(next.to_signed())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to supersede revision", e))?
        .ok_or_else(|| {
            AppError::conflict(format!(
                "Revision {} of '{}' changed concurrently",
                revision.id, revision.file_name
            ))
        })?;
        Revision::try_from(row)
    }

    async fn insert_in(
        tx: &mut Transaction<'_, Postgres>,
        revision: NewRevision,
    ) -> AppResult<Revision> {
        let state = revision.state()?;
        let row = sqlx::query_as::<_, RevisionRow>(&format!(
            "INSERT INTO revisions ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&revision.file_name)
        .bind(&revision.file_type)
        .bind(&revision.uploaded_by)
        .bind(&revision.role)
        .bind(&revision.project_folder)
        .bind(&revision.content)
        .bind(&revision.upload_date)
        .bind(state.to_signed())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!(
                    "Version {} of '{}' collides with an existing revision",
                    revision.sequence, revision.file_name
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert revision", e),
        })?;
        Revision::try_from(row)
    }

    async fn begin(&self) -> AppResult<Transaction<'_, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e))
    }

    async fn commit(tx: Transaction<'_, Postgres>) -> AppResult<()> {
        tx.commit()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to commit transaction", e))
    }
}

#[async_trait]
impl RevisionStore for PgRevisionRepository {
    async fn find_active(&self, file_name: &str) -> AppResult<Option<Revision>> {
        sqlx::query_as::<_, RevisionRow>(&format!(
            "SELECT {COLUMNS} FROM revisions WHERE file_name = $1 AND version > 0"
        ))
        .bind(file_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find active revision", e))?
        .map(Revision::try_from)
        .transpose()
    }

    async fn find_by_name_and_version(
        &self,
        file_name: &str,
        state: RevisionState,
    ) -> AppResult<Option<Revision>> {
        sqlx::query_as::<_, RevisionRow>(&format!(
            "SELECT {COLUMNS} FROM revisions WHERE file_name = $1 AND version = $2"
        ))
        .bind(file_name)
        .bind(state.to_signed())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find revision", e))?
        .map(Revision::try_from)
        .transpose()
    }

    async fn find_history(&self, file_name: &str) -> AppResult<Vec<Revision>> {
        self.fetch_list(
            &format!(
                "SELECT {COLUMNS} FROM revisions WHERE file_name = $1 AND version < 0 \
                 ORDER BY abs(version) ASC"
            ),
            Some(file_name),
        )
        .await
    }

    async fn find_all_active(&self) -> AppResult<Vec<Revision>> {
        self.fetch_list(
            &format!(
                "SELECT {COLUMNS} FROM revisions WHERE version > 0 ORDER BY file_name ASC"
            ),
            None,
        )
        .await
    }

    async fn find_all_history(&self) -> AppResult<Vec<Revision>> {
        self.fetch_list(
            &format!(
                "SELECT {COLUMNS} FROM revisions WHERE version < 0 \
                 ORDER BY file_name ASC, abs(version) ASC"
            ),
            None,
        )
        .await
    }

    async fn find_by_folder(&self, folder: &str) -> AppResult<Vec<Revision>> {
        self.fetch_list(
            &format!(
                "SELECT {COLUMNS} FROM revisions WHERE project_folder = $1 \
                 ORDER BY file_name ASC, abs(version) ASC"
            ),
            Some(folder),
        )
        .await
    }

    async fn insert(&self, revision: NewRevision) -> AppResult<Revision> {
        let mut tx = self.begin().await?;
        let inserted = Self::insert_in(&mut tx, revision).await?;
        Self::commit(tx).await?;
        Ok(inserted)
    }

    async fn supersede(&self, revision: &Revision) -> AppResult<Revision> {
        let mut tx = self.begin().await?;
        let superseded = Self::supersede_in(&mut tx, revision).await?;
        Self::commit(tx).await?;
        Ok(superseded)
    }

    async fn commit_successor(
        &self,
        current: Option<&Revision>,
        next: NewRevision,
    ) -> AppResult<Revision> {
        // Dropping the transaction on error rolls back the supersede.
        let mut tx = self.begin().await?;
        if let Some(current) = current {
            Self::supersede_in(&mut tx, current).await?;
        }
        let inserted = Self::insert_in(&mut tx, next).await?;
        Self::commit(tx).await?;
        Ok(inserted)
    }

    async fn delete_by_id(&self, id: RevisionId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM revisions WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete revision", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_name(&self, file_name: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM revisions WHERE file_name = $1")
            .bind(file_name)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete revisions", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_by_folder(&self, folder: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM revisions WHERE project_folder = $1")
            .bind(folder)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete folder revisions", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
