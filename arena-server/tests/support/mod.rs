#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use arena_config::{
    AuthConfig, Config, ConfigMetadata, CorsConfig, DatabaseConfig, ServerConfig, StorageBackend,
    StorageConfig, TranslationConfig,
};
use arena_core::auth::AuthCrypto;
use arena_core::catalog::{EntityKind, ListingFields, WriteMode};
use arena_core::database::ports::ListingRepository;
use arena_core::storage::LocalObjectStorage;
use arena_core::testing::InMemoryStore;
use arena_core::translation::{AutoTranslator, MockCompletionClient};
use arena_model::routes::v1;
use arena_server::{AppState, create_app};
use axum_test::TestServer;
use image::{ImageFormat, RgbaImage};
use serde_json::{Value, json};
use tempfile::TempDir;

pub const UPLOAD_LIMIT: usize = 64 * 1024;
pub const PASSWORD: &str = "s3cret-pass";

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub store: InMemoryStore,
    pub media: TempDir,
}

pub fn test_config(media_root: &Path, translation_enabled: bool) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
        },
        database: DatabaseConfig {
            url: None,
            max_connections: 1,
        },
        cors: CorsConfig {
            allowed_origins: vec![],
            allowed_methods: vec!["GET".into(), "POST".into()],
            allowed_headers: vec!["authorization".into()],
            allow_credentials: false,
        },
        auth: AuthConfig {
            jwt_secret: "test-secret-test-secret-test-secret".into(),
            token_ttl_secs: 3600,
            password_pepper: "test-pepper".into(),
        },
        storage: StorageConfig {
            backend: StorageBackend::Local,
            local_root: media_root.to_path_buf(),
            public_base_url: "/media".into(),
            endpoint: None,
            bucket: None,
            api_key: None,
            max_upload_bytes: UPLOAD_LIMIT,
        },
        translation: TranslationConfig {
            enabled: translation_enabled,
            endpoint: "http://127.0.0.1:9".into(),
            api_key: translation_enabled.then(|| "test-key".to_string()),
            model: "test-model".into(),
            timeout_secs: 5,
            temperature: 0.2,
        },
        dev_mode: true,
        metadata: ConfigMetadata::default(),
    }
}

/// App over in-memory adapters with translation disabled.
pub fn build_test_app() -> TestApp {
    build(None, |_| {})
}

/// App whose translator talks to `client`.
pub fn build_test_app_with_llm(client: MockCompletionClient) -> TestApp {
    build(Some(client), |_| {})
}

/// App with translation disabled and `configure` applied to the config.
pub fn build_test_app_with_config(configure: impl FnOnce(&mut Config)) -> TestApp {
    build(None, configure)
}

fn build(client: Option<MockCompletionClient>, configure: impl FnOnce(&mut Config)) -> TestApp {
    let media = tempfile::tempdir().unwrap();
    let store = InMemoryStore::default();
    let mut config = test_config(media.path(), client.is_some());
    configure(&mut config);
    let config = Arc::new(config);

    let translator = match client {
        Some(client) => AutoTranslator::new(store.listings.clone(), Arc::new(client)),
        None => AutoTranslator::disabled(store.listings.clone()),
    };
    let storage = Arc::new(LocalObjectStorage::new(
        media.path().to_path_buf(),
        "/media".to_string(),
    ));

    let state = AppState::new(
        config,
        store.unit_of_work(),
        storage,
        translator,
        AuthCrypto::for_tests("test-pepper"),
    );
    let server = TestServer::new(create_app(state.clone())).unwrap();

    TestApp {
        server,
        state,
        store,
        media,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Register through the API; returns the token and the user id.
pub async fn register(server: &TestServer, email: &str) -> (String, String) {
    let response = server
        .post(v1::auth::REGISTER)
        .json(&json!({ "email": email, "password": PASSWORD, "nombre": "Ana" }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: Value = response.json();
    (
        body["data"]["token"].as_str().unwrap().to_string(),
        body["data"]["user"]["id"].as_str().unwrap().to_string(),
    )
}

/// Create an admin account directly and log it in through the API.
pub async fn admin_token(app: &TestApp) -> String {
    app.state
        .accounts
        .ensure_admin("admin@example.com", PASSWORD, "Admin")
        .await
        .unwrap();
    let response = app
        .server
        .post(v1::auth::LOGIN)
        .json(&json!({ "email": "admin@example.com", "password": PASSWORD }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Insert a listing without going through the API.
pub async fn seed(store: &InMemoryStore, kind: EntityKind, payload: Value) -> i64 {
    let fields = ListingFields::from_payload(kind, &payload, WriteMode::Create).unwrap();
    store.listings.create(&fields).await.unwrap().id
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    RgbaImage::new(width, height)
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}
