//! Response DTOs.

use axum::Json;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use revhub_service::Committed;

/// Header set to `failed` when a committed change could not be mirrored.
pub const MIRROR_STATUS_HEADER: &str = "x-mirror-status";

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
    /// Present when the record was committed but the mirror step failed.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mirror_warning: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            mirror_warning: None,
        }
    }
}

/// Render a committed change, flagging a failed mirror step.
pub fn committed_response<T: Serialize>(status: StatusCode, committed: Committed<T>) -> Response {
    let warning = committed.mirror.failure().map(|err| match &err.source {
        Some(source) => format!("{}: {source}", err.message),
        None => err.message.clone(),
    });
    let failed = warning.is_some();

    let body = ApiResponse {
        success: true,
        data: committed.value,
        mirror_warning: warning,
    };
    let mut response = (status, Json(body)).into_response();
    if failed {
        response.headers_mut().insert(
            HeaderName::from_static(MIRROR_STATUS_HEADER),
            HeaderValue::from_static("failed"),
        );
    }
    response
}

/// Folder operation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderResponse {
    /// Folder path.
    pub folder: String,
    /// Whether the operation changed the mirror.
    pub changed: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Record store reachable.
    pub store: bool,
    /// Mirror root usable.
    pub mirror: bool,
}
