//! Folder handlers: create, delete, list records, and browse the mirror.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use revhub_core::error::AppError;
use revhub_entity::revision::RevisionSummary;

use crate::dto::response::{ApiResponse, FolderResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/files/folder/create?folderName=...
pub async fn create_folder(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<(StatusCode, Json<ApiResponse<FolderResponse>>)> {
    let folder = params
        .get("folderName")
        .ok_or_else(|| AppError::validation("folderName query parameter is required"))?
        .clone();

    if !state.versioning.create_folder(&folder).await? {
        return Err(AppError::validation(format!("Folder already exists: {folder}")).into());
    }
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(FolderResponse {
            folder,
            changed: true,
        })),
    ))
}

/// GET /api/files/folder/{folderName}
pub async fn list_folder(
    State(state): State<AppState>,
    Path(folder): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<RevisionSummary>>>> {
    let files = state.versioning.list_folder(&folder).await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// DELETE /api/files/folder/delete/{folderName}
pub async fn delete_folder(
    State(state): State<AppState>,
    Path(folder): Path<String>,
) -> ApiResult<Json<ApiResponse<FolderResponse>>> {
    let removed = state.versioning.delete_folder(&folder).await?;
    Ok(Json(ApiResponse::ok(FolderResponse {
        folder,
        changed: removed,
    })))
}

/// GET /api/files/folders
pub async fn mirror_tree(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.versioning.list_mirror_tree(None).await?))
}

/// GET /api/files/foldersOnly
pub async fn mirror_folders(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.versioning.list_mirror_folders().await?))
}

/// GET /api/files/folders/{*path}
pub async fn mirror_subtree(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.versioning.list_mirror_tree(Some(&path)).await?))
}
