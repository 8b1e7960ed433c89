//! Integration tests for artist handler routes
//!
//! Tests all artist-related API endpoints including:
//! - List, get, create and update artists
//! - Delete artists (blocked while albums reference them)
//! - List albums and songs of an artist

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use spoticfy::db::entities::artist;
use spoticfy::handlers;
use spoticfy::state::AppState;
use spoticfy::test_utils::*;

/// Helper to create a test router with catalog routes
fn create_test_router(state: &AppState) -> Router {
    handlers::api_routes().with_state(state.clone())
}

/// Helper to send a request with an optional JSON body
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> axum::response::Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Helper to parse JSON response body
async fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: axum::response::Response,
) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_list_artists() {
    let state = setup_test_app_state().await;
    seed_artists_and_albums(&state.db).await;
    let app = create_test_router(&state);

    let response = send(&app, "GET", "/artistas", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = parse_json_response(response).await;
    assert_eq!(
        body,
        json!([
            { "id": 1, "nombre": "Lean" },
            { "id": 2, "nombre": "Nacho" },
        ])
    );
}

#[tokio::test]
async fn test_get_artist() {
    let state = setup_test_app_state().await;
    seed_artists_and_albums(&state.db).await;
    let app = create_test_router(&state);

    let response = send(&app, "GET", "/artistas/2", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = parse_json_response(response).await;
    assert_eq!(body, json!({ "id": 2, "nombre": "Nacho" }));
}

#[tokio::test]
async fn test_get_artist_not_found() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = send(&app, "GET", "/artistas/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_artist() {
    let state = setup_test_app_state().await;
    seed_artists_and_albums(&state.db).await;
    let app = create_test_router(&state);

    let response = send(&app, "POST", "/artistas", Some(json!({ "nombre": "Mati" }))).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = parse_json_response(response).await;
    assert_eq!(body, json!({ "id": 3, "nombre": "Mati" }));

    let stored = artist::Entity::find_by_id(3).one(&state.db).await.unwrap();
    assert_eq!(stored.map(|a| a.nombre), Some("Mati".to_string()));
}

#[tokio::test]
async fn test_create_artist_blank_name() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = send(&app, "POST", "/artistas", Some(json!({ "nombre": "" }))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = parse_json_response(response).await;
    assert_eq!(body["error"], "bad_request");
    assert_eq!(artist::Entity::find().count(&state.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_artist() {
    let state = setup_test_app_state().await;
    seed_artists_and_albums(&state.db).await;
    let app = create_test_router(&state);

    let response = send(
        &app,
        "PUT",
        "/artistas/1",
        Some(json!({ "nombre": "Leandro" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = parse_json_response(response).await;
    assert_eq!(body, json!({ "id": 1, "nombre": "Leandro" }));

    // Album projections pick up the new name
    let response = send(&app, "GET", "/albumes/1", None).await;
    let body: Value = parse_json_response(response).await;
    assert_eq!(body["nombre_artista"], "Leandro");
}

#[tokio::test]
async fn test_update_artist_not_found() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = send(&app, "PUT", "/artistas/5", Some(json!({ "nombre": "X" }))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_artist_without_albums() {
    let state = setup_test_app_state().await;
    seed_artists_and_albums(&state.db).await;
    let solo = create_test_artist(&state.db, "Sin Discos").await;
    let app = create_test_router(&state);

    let response = send(&app, "DELETE", &format!("/artistas/{}", solo.id), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert!(artist::Entity::find_by_id(solo.id)
        .one(&state.db)
        .await
        .unwrap()
        .is_none());
    assert_eq!(artist::Entity::find().count(&state.db).await.unwrap(), 2);
}

#[tokio::test]
async fn test_delete_artist_with_albums_is_rejected() {
    let state = setup_test_app_state().await;
    seed_artists_and_albums(&state.db).await;
    let app = create_test_router(&state);

    let response = send(&app, "DELETE", "/artistas/2", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = parse_json_response(response).await;
    assert_eq!(body["error"], "constraint_violation");
    assert!(artist::Entity::find_by_id(2)
        .one(&state.db)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_delete_artist_not_found() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = send(&app, "DELETE", "/artistas/7", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_artist_albums() {
    let state = setup_test_app_state().await;
    seed_artists_and_albums(&state.db).await;
    let app = create_test_router(&state);

    let response = send(&app, "GET", "/artistas/1/albumes", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = parse_json_response(response).await;
    assert_eq!(
        body,
        json!([
            { "id": 1, "nombre": "La Base de los Datos", "nombre_artista": "Lean" },
            { "id": 2, "nombre": "Ya lo sabIA", "nombre_artista": "Lean" },
        ])
    );
}

#[tokio::test]
async fn test_list_artist_albums_unknown_artist() {
    let state = setup_test_app_state().await;
    seed_artists_and_albums(&state.db).await;
    let app = create_test_router(&state);

    let response = send(&app, "GET", "/artistas/9/albumes", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_artist_songs() {
    let state = setup_test_app_state().await;
    seed_catalog(&state.db).await;
    let app = create_test_router(&state);

    let response = send(&app, "GET", "/artistas/2/canciones", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = parse_json_response(response).await;
    assert_eq!(
        body,
        json!([
            {
                "id": 2,
                "nombre": "Sos el WHERE de mi SELECT",
                "duracion": 200,
                "reproducciones": 150,
                "nombre_artista": "Nacho",
                "nombre_album": "No es Java",
            },
        ])
    );

    let response = send(&app, "GET", "/artistas/1/canciones", None).await;
    let body: Value = parse_json_response(response).await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_list_artist_songs_unknown_artist() {
    let state = setup_test_app_state().await;
    let app = create_test_router(&state);

    let response = send(&app, "GET", "/artistas/1/canciones", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
