use arena_model::routes::{utils as route_utils, v1};
use axum::http::StatusCode;
use serde_json::{Value, json};

#[path = "support/mod.rs"]
mod support;

use support::{PASSWORD, admin_token, bearer, build_test_app, register};

#[tokio::test]
async fn register_login_and_me() {
    let app = build_test_app();
    let (token, user_id) = register(&app.server, "Ana@Example.com").await;

    let me = app
        .server
        .get(v1::auth::ME)
        .add_header("Authorization", bearer(&token))
        .await;
    me.assert_status_ok();
    let body: Value = me.json();
    assert_eq!(body["data"]["id"], user_id.as_str());
    assert_eq!(body["data"]["email"], "ana@example.com");
    assert_eq!(body["data"]["role"], "user");
    assert!(body["data"].get("password_hash").is_none());

    let login = app
        .server
        .post(v1::auth::LOGIN)
        .json(&json!({ "email": "ana@example.com", "password": PASSWORD }))
        .await;
    login.assert_status_ok();
    let body: Value = login.json();
    assert!(body["data"]["token"].as_str().is_some());
    assert!(body["data"]["expires_at"].as_str().is_some());
}

#[tokio::test]
async fn credential_errors() {
    let app = build_test_app();
    register(&app.server, "ana@example.com").await;

    app.server
        .post(v1::auth::REGISTER)
        .json(&json!({ "email": "ANA@example.com", "password": PASSWORD, "nombre": "Otra" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    app.server
        .post(v1::auth::REGISTER)
        .json(&json!({ "email": "bob@example.com", "password": "short", "nombre": "Bob" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .post(v1::auth::REGISTER)
        .json(&json!({ "email": "bob@example.com" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let wrong = app
        .server
        .post(v1::auth::LOGIN)
        .json(&json!({ "email": "ana@example.com", "password": "wrong-password" }))
        .await;
    wrong.assert_status(StatusCode::UNAUTHORIZED);
    let unknown = app
        .server
        .post(v1::auth::LOGIN)
        .json(&json!({ "email": "nadie@example.com", "password": PASSWORD }))
        .await;
    unknown.assert_status(StatusCode::UNAUTHORIZED);
    let wrong: Value = wrong.json();
    let unknown: Value = unknown.json();
    assert_eq!(wrong["error"]["message"], unknown["error"]["message"]);

    app.server
        .get(v1::auth::ME)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    app.server
        .get(v1::auth::ME)
        .add_header("Authorization", "Basic YWRtaW46YWRtaW4=")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admins_manage_roles() {
    let app = build_test_app();
    let admin = admin_token(&app).await;
    let (user_token, user_id) = register(&app.server, "ana@example.com").await;

    app.server
        .get(v1::admin::users::COLLECTION)
        .add_header("Authorization", bearer(&user_token))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let users = app
        .server
        .get(v1::admin::users::COLLECTION)
        .add_header("Authorization", bearer(&admin))
        .await;
    users.assert_status_ok();
    let body: Value = users.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let promoted = app
        .server
        .put(&route_utils::replace_param(v1::admin::users::ROLE, "{id}", &user_id))
        .add_header("Authorization", bearer(&admin))
        .json(&json!({ "role": "admin" }))
        .await;
    promoted.assert_status_ok();
    let body: Value = promoted.json();
    assert_eq!(body["data"]["role"], "admin");

    let me: Value = app
        .server
        .get(v1::auth::ME)
        .add_header("Authorization", bearer(&admin))
        .await
        .json();
    let admin_id = me["data"]["id"].as_str().unwrap().to_string();
    app.server
        .put(&route_utils::replace_param(v1::admin::users::ROLE, "{id}", &admin_id))
        .add_header("Authorization", bearer(&admin))
        .json(&json!({ "role": "user" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    app.server
        .put(&route_utils::replace_param(
            v1::admin::users::ROLE,
            "{id}",
            "00000000-0000-0000-0000-000000000000",
        ))
        .add_header("Authorization", bearer(&admin))
        .json(&json!({ "role": "user" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
