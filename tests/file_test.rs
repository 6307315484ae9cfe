//! Integration tests for versioned file operations over HTTP.

mod helpers;

use axum::http::StatusCode;

fn upload_fields(folder: &str) -> [(&'static str, &str); 3] {
    [
        ("uploadedBy", "alice"),
        ("role", "developer"),
        ("projectFolder", folder),
    ]
}

#[tokio::test]
async fn test_history_scenario_end_to_end() {
    let app = helpers::TestApp::new().await;

    let res = app
        .form("POST", "/api/files/fileUpload", "a.txt", "B1", &upload_fields("p"))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.mirror_status.is_none());

    let res = app
        .form(
            "PUT",
            "/api/files/update/a.txt",
            "a.txt",
            "B2",
            &[("uploadedBy", "bob"), ("projectFolder", "p")],
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["data"]["role"], "developer");

    let res = app.request("PUT", "/api/files/rollback/a.txt/1").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["data"]["version"], 3);
    assert_eq!(res.json()["data"]["uploadedBy"], "alice");

    let mirrored = std::fs::read(app.mirror_root.join("p").join("a.txt")).unwrap();
    assert_eq!(mirrored, b"B1");
    assert_eq!(app.store.len().await, 3);

    let res = app.request("GET", "/api/files/previous").await;
    let history = res.json()["data"].as_array().unwrap().clone();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|s| s["active"] == false));
}

#[tokio::test]
async fn test_rollback_to_unknown_version_changes_nothing() {
    let app = helpers::TestApp::new().await;
    app.form("POST", "/api/files/fileUpload", "a.txt", "B1", &upload_fields("p"))
        .await;

    let res = app.request("PUT", "/api/files/rollback/a.txt/5").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.json()["error"], "REVISION_NOT_FOUND");

    let res = app.request("GET", "/api/files/all").await;
    let active = res.json()["data"].as_array().unwrap().clone();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["version"], 1);
    assert_eq!(app.store.len().await, 1);
}

#[tokio::test]
async fn test_folder_with_history_cannot_be_deleted() {
    let app = helpers::TestApp::new().await;
    app.form("POST", "/api/files/fileUpload", "a.txt", "B1", &upload_fields("p"))
        .await;
    app.form("POST", "/api/files/fileUpload", "a.txt", "B2", &upload_fields("p"))
        .await;

    let res = app.request("DELETE", "/api/files/delete/a.txt").await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.request("GET", "/api/files/folder/p").await;
    assert_eq!(res.json()["data"].as_array().unwrap().len(), 1);

    let res = app.request("DELETE", "/api/files/folder/delete/p").await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.json()["error"], "FOLDER_NOT_EMPTY");
    assert!(app.mirror_root.join("p").is_dir());
}

#[tokio::test]
async fn test_reconcile_restores_deleted_mirror_file() {
    let app = helpers::TestApp::new().await;
    app.form("POST", "/api/files/fileUpload", "a.txt", "B1", &upload_fields("team/alpha"))
        .await;
    let path = app.mirror_root.join("team").join("alpha").join("a.txt");
    std::fs::remove_file(&path).unwrap();

    let res = app.request("POST", "/api/files/reconcile").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["data"]["synced"], 1);
    assert_eq!(std::fs::read(&path).unwrap(), b"B1");
}
