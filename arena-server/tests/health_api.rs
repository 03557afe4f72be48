use arena_model::routes;
use axum::http::StatusCode;
use serde_json::{Value, json};

#[path = "support/mod.rs"]
mod support;

use support::build_test_app;

#[tokio::test]
async fn ping_reports_version() {
    let app = build_test_app();
    let response = app.server.get(routes::PING).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn health_reflects_the_database_check() {
    let app = build_test_app();

    let healthy = app.server.get(routes::HEALTH).await;
    healthy.assert_status_ok();
    let body: Value = healthy.json();
    assert_eq!(body["checks"]["database"]["status"], "healthy");
    assert_eq!(body["checks"]["storage"]["backend"], "local");
    assert_eq!(body["checks"]["translation"]["enabled"], json!(false));

    app.store.health.set_healthy(false);
    let unhealthy = app.server.get(routes::HEALTH).await;
    unhealthy.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = unhealthy.json();
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["checks"]["database"]["status"], "unhealthy");
}
