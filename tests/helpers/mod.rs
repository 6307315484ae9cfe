//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use revhub_api::{AppState, build_router};
use revhub_core::config::AppConfig;
use revhub_database::MemoryRevisionStore;
use revhub_service::VersioningService;
use revhub_storage::LocalMirror;

const BOUNDARY: &str = "revhub-integration-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Record store behind the engine, for direct inspection
    pub store: MemoryRevisionStore,
    /// Mirror root on disk
    pub mirror_root: std::path::PathBuf,
    _dir: tempfile::TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// `x-mirror-status` header, if set
    pub mirror_status: Option<String>,
    /// Raw body
    pub bytes: Vec<u8>,
}

impl TestResponse {
    /// Body parsed as JSON, or `Null` if it is not JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.bytes).unwrap_or(Value::Null)
    }
}

impl TestApp {
    /// Create a new test application over a memory store and a temp mirror
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let mut config = AppConfig::default();
        config.storage.root = dir.path().join("uploads").to_string_lossy().into_owned();

        let store = MemoryRevisionStore::new();
        let mirror = LocalMirror::new(&config.storage.root)
            .await
            .expect("Failed to create mirror");
        let mirror_root = mirror.root().to_path_buf();
        let engine = VersioningService::new(Arc::new(store.clone()), Arc::new(mirror));

        Self {
            router: build_router(AppState::new(config, engine)),
            store,
            mirror_root,
            _dir: dir,
        }
    }

    /// Send a request without a body
    pub async fn request(&self, method: &str, path: &str) -> TestResponse {
        let req = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");
        self.send(req).await
    }

    /// Send a multipart form with a `file` part and text fields
    pub async fn form(
        &self,
        method: &str,
        path: &str,
        file_name: &str,
        content: &str,
        fields: &[(&str, &str)],
    ) -> TestResponse {
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

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let mirror_status = response
            .headers()
            .get("x-mirror-status")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            mirror_status,
            bytes: bytes.to_vec(),
        }
    }
}
