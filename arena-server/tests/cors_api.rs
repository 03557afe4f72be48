use arena_model::routes::v1;
use axum::http::{HeaderMap, Method};

#[path = "support/mod.rs"]
mod support;

use support::build_test_app_with_config;

async fn preflight(server: &axum_test::TestServer, origin: &str) -> HeaderMap {
    server
        .method(Method::OPTIONS, v1::auth::LOGIN)
        .add_header("Origin", origin)
        .add_header("Access-Control-Request-Method", "POST")
        .await
        .headers()
        .clone()
}

#[tokio::test]
async fn production_allow_list_only_admits_listed_origins() {
    let app = build_test_app_with_config(|config| {
        config.dev_mode = false;
        config.cors.allowed_origins = vec!["https://admin.arena.example".into()];
    });

    let allowed = preflight(&app.server, "https://admin.arena.example").await;
    assert_eq!(
        allowed.get("access-control-allow-origin").unwrap(),
        "https://admin.arena.example"
    );

    let foreign = preflight(&app.server, "https://evil.example").await;
    assert!(foreign.get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn empty_production_allow_list_admits_nobody() {
    let app = build_test_app_with_config(|config| {
        config.dev_mode = false;
        config.cors.allowed_origins = vec![];
        config.cors.allow_credentials = true;
    });

    let headers = preflight(&app.server, "https://evil.example").await;
    assert!(headers.get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn dev_mode_is_permissive() {
    let app = build_test_app_with_config(|config| config.dev_mode = true);

    let headers = preflight(&app.server, "http://localhost:5173").await;
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
}
