pub mod v1;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
    routing::get,
};
use arena_config::constants::LOCAL_MEDIA_MOUNT;
use arena_config::{Config, StorageBackend};
use arena_model::routes;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::health;
use crate::infra::app_state::AppState;

/// Create the main API router with all versions
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new().merge(v1::create_v1_router(state))
}

/// The full application: operational endpoints, the versioned API, local
/// media and the outer layers.
pub fn create_app(state: AppState) -> Router {
    let mut app = Router::new()
        .route(routes::PING, get(health::ping))
        .route(routes::HEALTH, get(health::health))
        .merge(create_api_router(state.clone()));

    if state.config().storage.backend == StorageBackend::Local {
        app = app.nest_service(
            LOCAL_MEDIA_MOUNT,
            ServeDir::new(&state.config().storage.local_root),
        );
    }

    app.layer(TraceLayer::new_for_http())
        .layer(cors_layer(state.config()))
        .with_state(state)
}

/// Permissive in dev mode, allow-list otherwise.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.dev_mode {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter(|origin| origin.trim() != "*")
        .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
        .collect();
    let methods: Vec<Method> = config
        .cors
        .allowed_methods
        .iter()
        .filter_map(|method| Method::from_bytes(method.as_bytes()).ok())
        .collect();
    let headers: Vec<HeaderName> = config
        .cors
        .allowed_headers
        .iter()
        .filter_map(|header| HeaderName::from_bytes(header.as_bytes()).ok())
        .collect();

    // An empty allow-list admits no cross-origin callers.
    CorsLayer::new()
        .allow_methods(AllowMethods::list(methods))
        .allow_headers(AllowHeaders::list(headers))
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(config.cors.allow_credentials)
}
