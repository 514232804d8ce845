use std::sync::Arc;

use serde_json::json;

use festival_server::config::DatabaseConfig;

use crate::common::{TestApp, UnavailableStore, routes, test_config};

#[tokio::test]
async fn health_reports_the_backend() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::HEALTH).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body, json!({"status": "ok", "database": "sqlite"}));
}

#[tokio::test]
async fn health_is_unavailable_when_the_database_is_down() {
    let app = TestApp::spawn_with_store(
        Arc::new(UnavailableStore),
        test_config(DatabaseConfig::sqlite_at("unused.db")),
    )
    .await;

    let res = app.get_without_token(routes::HEALTH).await;

    assert_eq!(res.status, 503);
    assert_eq!(res.body["status"], "unavailable");
}

#[tokio::test]
async fn storage_failures_surface_as_generic_internal_errors() {
    let app = TestApp::spawn_with_store(
        Arc::new(UnavailableStore),
        test_config(DatabaseConfig::sqlite_at("unused.db")),
    )
    .await;

    let res = app
        .post_without_token(routes::LOGIN, &json!({"email": "a@x.com", "password": "p1"}))
        .await;

    assert_eq!(res.status, 500);
    assert_eq!(res.body["code"], "INTERNAL_ERROR");
    assert!(!res.text.contains("within"));
}

#[tokio::test]
async fn openapi_document_lists_every_route() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::OPENAPI).await;

    assert_eq!(res.status, 200);
    let paths = res.body["paths"].as_object().unwrap();
    for path in [
        "/api/auth/login",
        "/api/students",
        "/api/admin/login",
        "/api/admin/submissions",
        "/api/admin/export",
        "/health",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}

#[tokio::test]
async fn cors_preflight_allows_the_configured_origin() {
    let app = TestApp::spawn().await;

    let res = app
        .client
        .request(reqwest::Method::OPTIONS, app.url(routes::STUDENTS))
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "authorization,content-type")
        .send()
        .await
        .unwrap();

    assert!(res.status().is_success());
    assert_eq!(
        res.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );
}
