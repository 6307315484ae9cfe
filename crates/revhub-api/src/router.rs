//! Route definitions for the RevHub HTTP API.
//!
//! File and folder routes are mounted under `/api/files`, health under
//! `/api/health`. Every handler receives `AppState` via Axum's `State`
//! extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.storage.max_upload_size_bytes).unwrap_or(usize::MAX);
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new()
        .nest("/files", file_routes().merge(folder_routes()))
        .route("/health", get(handlers::health::health));

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Upload, update, rollback, delete, history, download
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/fileUpload", post(handlers::files::upload))
        .route("/update/{file_name}", put(handlers::files::update))
        .route(
            "/rollback/{file_name}/{version}",
            put(handlers::files::rollback),
        )
        .route("/delete/{file_name}", delete(handlers::files::delete))
        .route("/all", get(handlers::files::list_active))
        .route("/previous", get(handlers::files::list_all_history))
        .route("/previous/{file_name}", get(handlers::files::list_history))
        .route("/download/{file_name}", get(handlers::files::download))
        .route(
            "/download/previous/{file_name}/{version}",
            get(handlers::files::download_version),
        )
        .route("/reconcile", post(handlers::files::reconcile))
}

/// Folder records and mirror browsing
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route("/folder/create", post(handlers::folders::create_folder))
        .route("/folder/{folder}", get(handlers::folders::list_folder))
        .route(
            "/folder/delete/{folder}",
            delete(handlers::folders::delete_folder),
        )
        .route("/folders", get(handlers::folders::mirror_tree))
        .route("/foldersOnly", get(handlers::folders::mirror_folders))
        .route("/folders/{*path}", get(handlers::folders::mirror_subtree))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use revhub_core::config::AppConfig;
    use revhub_database::MemoryRevisionStore;
    use revhub_service::VersioningService;
    use revhub_storage::LocalMirror;

    use super::*;

    const BOUNDARY: &str = "revhub-test-boundary";

    async fn app() -> (tempfile::TempDir, Router) {
        let dir = tempfile::tempdir().unwrap();
        let mirror = LocalMirror::new(dir.path().join("uploads")).await.unwrap();
        let engine = VersioningService::new(Arc::new(MemoryRevisionStore::new()), Arc::new(mirror));
        let router = build_router(AppState::new(AppConfig::default(), engine));
        (dir, router)
    }

    fn multipart(file_name: &str, content: &str, fields: &[(&str, &str)]) -> Body {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            ));
        }
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: text/plain\r\n\r\n{content}\r\n--{BOUNDARY}--\r\n"
        ));
        Body::from(body)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        (status, headers, body.to_vec())
    }

    fn form_request(method: &str, uri: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(body)
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn json(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_upload_update_rollback_download() {
        let (_dir, router) = app().await;

        let upload = multipart(
            "a.txt",
            "B1",
            &[("uploadedBy", "alice"), ("role", "developer"), ("projectFolder", "p")],
        );
        let (status, headers, body) =
            send(&router, form_request("POST", "/api/files/fileUpload", upload)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get(crate::dto::response::MIRROR_STATUS_HEADER).is_none());
        let body = json(&body);
        assert_eq!(body["data"]["version"], 1);
        assert_eq!(body["data"]["fileName"], "a.txt");
        assert!(body.get("mirror_warning").is_none());

        let update = multipart("a.txt", "B2", &[("uploadedBy", "bob"), ("projectFolder", "p")]);
        let (status, _, body) =
            send(&router, form_request("PUT", "/api/files/update/a.txt", update)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["data"]["version"], 2);

        let (status, _, body) =
            send(&router, empty_request("PUT", "/api/files/rollback/a.txt/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["data"]["version"], 3);

        let (status, headers, body) =
            send(&router, empty_request("GET", "/api/files/download/a.txt")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"B1");
        assert_eq!(headers["content-type"], "text/plain");

        let (status, _, body) = send(
            &router,
            empty_request("GET", "/api/files/download/previous/a.txt/2"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"B2");

        let (_, _, body) = send(&router, empty_request("GET", "/api/files/previous/a.txt")).await;
        let versions: Vec<i64> = json(&body)["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["version"].as_i64().unwrap())
            .collect();
        assert_eq!(versions, vec![-1, -2]);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let (_dir, router) = app().await;

        let (status, _, body) =
            send(&router, empty_request("GET", "/api/files/download/missing.txt")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json(&body)["error"], "ACTIVE_NOT_FOUND");

        let update = multipart("a.txt", "x", &[("uploadedBy", "bob"), ("projectFolder", "p")]);
        let (status, _, _) =
            send(&router, form_request("PUT", "/api/files/update/a.txt", update)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) =
            send(&router, empty_request("PUT", "/api/files/rollback/a.txt/0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let incomplete = multipart("a.txt", "x", &[("uploadedBy", "alice")]);
        let (status, _, body) =
            send(&router, form_request("POST", "/api/files/fileUpload", incomplete)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json(&body)["error"], "VALIDATION");
    }

    #[tokio::test]
    async fn test_delete_and_folders() {
        let (_dir, router) = app().await;

        let (status, _, _) = send(
            &router,
            empty_request("POST", "/api/files/folder/create?folderName=p"),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _, _) = send(
            &router,
            empty_request("POST", "/api/files/folder/create?folderName=p"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let upload = multipart(
            "a.txt",
            "B1",
            &[("uploadedBy", "alice"), ("role", "developer"), ("projectFolder", "p")],
        );
        send(&router, form_request("POST", "/api/files/fileUpload", upload)).await;

        let (_, _, body) = send(&router, empty_request("GET", "/api/files/folders")).await;
        assert_eq!(json(&body), serde_json::json!(["p", "p/a.txt"]));
        let (_, _, body) = send(&router, empty_request("GET", "/api/files/folders/p")).await;
        assert_eq!(json(&body), serde_json::json!(["a.txt"]));
        let (_, _, body) = send(&router, empty_request("GET", "/api/files/foldersOnly")).await;
        assert_eq!(json(&body), serde_json::json!(["p"]));

        let (status, _, _) =
            send(&router, empty_request("DELETE", "/api/files/folder/delete/p")).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _, body) =
            send(&router, empty_request("DELETE", "/api/files/delete/a.txt")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["data"]["version"], 1);

        let (_, _, body) = send(&router, empty_request("GET", "/api/files/all")).await;
        assert!(json(&body)["data"].as_array().unwrap().is_empty());

        // a.txt had no superseded revisions, so "p" is now unreferenced.
        let (_, _, body) = send(&router, empty_request("GET", "/api/files/folder/p")).await;
        assert!(json(&body)["data"].as_array().unwrap().is_empty());
        let (status, _, body) =
            send(&router, empty_request("DELETE", "/api/files/folder/delete/p")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["data"]["changed"], true);
    }

    #[tokio::test]
    async fn test_health_and_reconcile() {
        let (_dir, router) = app().await;

        let (status, _, body) = send(&router, empty_request("GET", "/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["data"]["status"], "ok");

        let (status, _, body) = send(&router, empty_request("POST", "/api/files/reconcile")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["data"]["synced"], 0);
    }
}
