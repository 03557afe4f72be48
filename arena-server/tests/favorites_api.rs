use arena_core::catalog::EntityKind;
use arena_model::routes::{utils as route_utils, v1};
use axum::http::StatusCode;
use serde_json::{Value, json};

#[path = "support/mod.rs"]
mod support;

use support::{admin_token, bearer, build_test_app, register, seed};

fn favorite_item(item_type: &str, item_id: i64) -> String {
    route_utils::replace_params(
        v1::favoritos::ITEM,
        &[("{item_type}", item_type), ("{item_id}", item_id.to_string().as_str())],
    )
}

#[tokio::test]
async fn add_list_and_remove() {
    let app = build_test_app();
    let (token, user_id) = register(&app.server, "ana@example.com").await;
    let hotel = seed(
        &app.store,
        EntityKind::Hoteles,
        json!({ "nombre": "Faena", "servicios": "Spa", "servicios_pt": "Spa e piscina" }),
    )
    .await;

    let first = app
        .server
        .post(v1::favoritos::COLLECTION)
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "item_type": "hoteles", "item_id": hotel }))
        .await;
    first.assert_status(StatusCode::CREATED);
    let body: Value = first.json();
    assert_eq!(body["data"]["item_type"], "hotel");
    assert_eq!(body["data"]["user_id"], user_id.as_str());

    app.server
        .post(v1::favoritos::COLLECTION)
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "item_type": "hotel", "item_id": hotel }))
        .await
        .assert_status_ok();

    let expanded = app
        .server
        .get(&route_utils::with_query(
            v1::favoritos::COLLECTION,
            &[("expand", "true"), ("lang", "pt")],
        ))
        .add_header("Authorization", bearer(&token))
        .await;
    expanded.assert_status_ok();
    let body: Value = expanded.json();
    let favorites = body["data"].as_array().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0]["item"]["servicios"], "Spa e piscina");

    let status: Value = app
        .server
        .get(&favorite_item("hotel", hotel))
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert_eq!(status["data"]["is_favorite"], json!(true));

    app.server
        .delete(&favorite_item("hoteles", hotel))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    app.server
        .delete(&favorite_item("hoteles", hotel))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn toggle_and_scoping() {
    let app = build_test_app();
    let (ana, _) = register(&app.server, "ana@example.com").await;
    let (bob, _) = register(&app.server, "bob@example.com").await;
    let evento = seed(
        &app.store,
        EntityKind::Eventos,
        json!({ "nombre": "Noche de los Museos", "fecha_inicio": "2026-11-07" }),
    )
    .await;

    let on: Value = app
        .server
        .post(v1::favoritos::TOGGLE)
        .add_header("Authorization", bearer(&ana))
        .json(&json!({ "item_type": "evento", "item_id": evento }))
        .await
        .json();
    assert_eq!(on["data"]["is_favorite"], json!(true));

    let bobs: Value = app
        .server
        .get(v1::favoritos::COLLECTION)
        .add_header("Authorization", bearer(&bob))
        .await
        .json();
    assert!(bobs["data"].as_array().unwrap().is_empty());

    let off: Value = app
        .server
        .post(v1::favoritos::TOGGLE)
        .add_header("Authorization", bearer(&ana))
        .json(&json!({ "item_type": "evento", "item_id": evento }))
        .await
        .json();
    assert_eq!(off["data"]["is_favorite"], json!(false));

    app.server
        .get(v1::favoritos::COLLECTION)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    app.server
        .post(v1::favoritos::COLLECTION)
        .add_header("Authorization", bearer(&ana))
        .json(&json!({ "item_type": "bar", "item_id": 999 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .get(&route_utils::with_query(
            v1::favoritos::COLLECTION,
            &[("item_type", "museos")],
        ))
        .add_header("Authorization", bearer(&ana))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_listing_drops_its_favorites() {
    let app = build_test_app();
    let admin = admin_token(&app).await;
    let (token, _) = register(&app.server, "ana@example.com").await;
    let bar = seed(&app.store, EntityKind::Bares, json!({ "nombre": "Florería Atlántico" })).await;

    app.server
        .post(v1::favoritos::COLLECTION)
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "item_type": "bar", "item_id": bar }))
        .await
        .assert_status(StatusCode::CREATED);

    app.server
        .delete(&route_utils::replace_params(
            v1::admin::listings::ITEM,
            &[("{entity}", "bares"), ("{id}", bar.to_string().as_str())],
        ))
        .add_header("Authorization", bearer(&admin))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let left: Value = app
        .server
        .get(v1::favoritos::COLLECTION)
        .add_header("Authorization", bearer(&token))
        .await
        .json();
    assert!(left["data"].as_array().unwrap().is_empty());
}
