use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
};
use arena_model::routes::v1;

use crate::auth::{admin_middleware, auth_middleware};
use crate::handlers::{accounts, favorites, listings, translations, uploads};
use crate::infra::app_state::AppState;

/// Create all v1 API routes
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        // Public authentication endpoints
        .route(v1::auth::REGISTER, post(accounts::register))
        .route(v1::auth::LOGIN, post(accounts::login))
        // Consumer reads
        .route(v1::listings::COLLECTION, get(listings::list_public))
        .route(v1::listings::ITEM, get(listings::get_public))
        .merge(create_protected_routes(state.clone()))
        .merge(create_admin_routes(state))
}

/// Routes that require a valid bearer token.
fn create_protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(v1::auth::ME, get(accounts::me))
        .route(
            v1::favoritos::COLLECTION,
            get(favorites::list).post(favorites::add),
        )
        .route(v1::favoritos::TOGGLE, post(favorites::toggle))
        .route(
            v1::favoritos::ITEM,
            get(favorites::status).delete(favorites::remove),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn create_admin_routes(state: AppState) -> Router<AppState> {
    let upload_limit = state.config().storage.max_upload_bytes;

    Router::new()
        .route(
            v1::admin::listings::COLLECTION,
            get(listings::list_admin).post(listings::create),
        )
        .route(
            v1::admin::listings::ITEM,
            get(listings::get_admin)
                .put(listings::update)
                .delete(listings::delete),
        )
        .route(
            v1::admin::listings::TRANSLATE,
            post(translations::translate_listing),
        )
        .route(
            v1::admin::listings::TRANSLATE_MISSING,
            post(translations::translate_missing),
        )
        .route(
            v1::admin::uploads::COLLECTION,
            post(uploads::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(v1::admin::uploads::ITEM, axum::routing::delete(uploads::delete))
        .route(v1::admin::users::COLLECTION, get(accounts::list_users))
        .route(v1::admin::users::ROLE, put(accounts::set_role))
        // The last layer runs first: authenticate, then check the role.
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
