//! File upload, update, rollback, delete, listing, and download handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::Response;
use bytes::Bytes;

use revhub_core::error::AppError;
use revhub_entity::revision::RevisionSummary;
use revhub_service::{DownloadedFile, ReconcileReport, UpdateRequest, UploadRequest};

use crate::dto::response::{ApiResponse, committed_response};
use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Fields collected from an upload form.
#[derive(Debug, Default)]
struct UploadForm {
    file_name: Option<String>,
    file_type: Option<String>,
    content: Option<Bytes>,
    uploaded_by: Option<String>,
    role: Option<String>,
    project_folder: Option<String>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "file" => {
                    form.file_name = field.file_name().map(String::from);
                    form.file_type = field.content_type().map(String::from);
                    form.content = Some(
                        field
                            .bytes()
                            .await
                            .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                    );
                }
                "uploadedBy" | "role" | "projectFolder" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                    match name.as_str() {
                        "uploadedBy" => form.uploaded_by = Some(text),
                        "role" => form.role = Some(text),
                        _ => form.project_folder = Some(text),
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::validation(format!("{field} is required")))
}

/// POST /api/files/fileUpload
pub async fn upload(State(state): State<AppState>, multipart: Multipart) -> ApiResult<Response> {
    let form = UploadForm::read(multipart).await?;
    let content = form
        .content
        .ok_or_else(|| AppError::validation("file is required"))?;

    let committed = state
        .versioning
        .upload(UploadRequest {
            file_name: required(form.file_name, "file name")?,
            file_type: form
                .file_type
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            uploaded_by: required(form.uploaded_by, "uploadedBy")?,
            role: required(form.role, "role")?,
            folder: required(form.project_folder, "projectFolder")?,
            content,
        })
        .await?;

    Ok(committed_response(
        StatusCode::OK,
        committed.map(RevisionSummary::from),
    ))
}

/// PUT /api/files/update/{fileName}
pub async fn update(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let form = UploadForm::read(multipart).await?;
    let content = form
        .content
        .ok_or_else(|| AppError::validation("file is required"))?;

    let committed = state
        .versioning
        .update(UpdateRequest {
            file_name,
            uploaded_by: required(form.uploaded_by, "uploadedBy")?,
            folder: required(form.project_folder, "projectFolder")?,
            content,
        })
        .await?;

    Ok(committed_response(
        StatusCode::OK,
        committed.map(RevisionSummary::from),
    ))
}

/// PUT /api/files/rollback/{fileName}/{version}
pub async fn rollback(
    State(state): State<AppState>,
    Path((file_name, version)): Path<(String, i64)>,
) -> ApiResult<Response> {
    let committed = state.versioning.rollback(&file_name, version).await?;
    Ok(committed_response(
        StatusCode::OK,
        committed.map(RevisionSummary::from),
    ))
}

/// DELETE /api/files/delete/{fileName}
pub async fn delete(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> ApiResult<Response> {
    let committed = state.versioning.delete(&file_name).await?;
    Ok(committed_response(
        StatusCode::OK,
        committed.map(|deleted| deleted.map(RevisionSummary::from)),
    ))
}

/// GET /api/files/all
pub async fn list_active(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<RevisionSummary>>>> {
    let files = state.versioning.list_active().await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// GET /api/files/previous
pub async fn list_all_history(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<RevisionSummary>>>> {
    let files = state.versioning.list_history(None).await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// GET /api/files/previous/{fileName}
pub async fn list_history(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<RevisionSummary>>>> {
    let files = state.versioning.list_history(Some(&file_name)).await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// GET /api/files/download/{fileName}
pub async fn download(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> ApiResult<Response> {
    let file = state.versioning.download(&file_name).await?;
    Ok(attachment(file)?)
}

/// GET /api/files/download/previous/{fileName}/{version}
pub async fn download_version(
    State(state): State<AppState>,
    Path((file_name, version)): Path<(String, i64)>,
) -> ApiResult<Response> {
    let file = state
        .versioning
        .download_version(&file_name, version)
        .await?;
    Ok(attachment(file)?)
}

/// POST /api/files/reconcile
pub async fn reconcile(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<ReconcileReport>>> {
    let report = state.versioning.reconcile_all().await?;
    Ok(Json(ApiResponse::ok(report)))
}

fn attachment(file: DownloadedFile) -> Result<Response, AppError> {
    let content_type = HeaderValue::from_str(&file.file_type)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    let disposition = format!(
        "attachment; filename=\"{}\"",
        file.file_name.replace('"', "")
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::CONTENT_LENGTH, file.content.len())
        .body(Body::from(file.content))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}
