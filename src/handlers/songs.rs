use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    db::entities::song,
    error::Result,
    handlers::extract::{JsonBody, PathParam},
    services::SongView,
    state::AppState,
};

/// Body of `POST /canciones` and `PUT /canciones/:id`.
///
/// Unknown fields are ignored, so a client-supplied `reproducciones` never
/// reaches the store.
#[derive(Deserialize)]
pub struct SongRequest {
    pub nombre: String,
    pub duracion: i32,
    pub album: i32,
}

pub async fn list_songs(State(state): State<AppState>) -> Result<Json<Vec<SongView>>> {
    Ok(Json(state.catalog.list_songs().await?))
}

pub async fn get_song(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<SongView>> {
    Ok(Json(state.catalog.get_song(id).await?))
}

pub async fn create_song(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SongRequest>,
) -> Result<(StatusCode, Json<song::Model>)> {
    let song = state
        .catalog
        .create_song(&payload.nombre, payload.duracion, payload.album)
        .await?;
    Ok((StatusCode::CREATED, Json(song)))
}

pub async fn update_song(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<SongRequest>,
) -> Result<Json<song::Model>> {
    let song = state
        .catalog
        .update_song(id, &payload.nombre, payload.duracion, payload.album)
        .await?;
    Ok(Json(song))
}

pub async fn delete_song(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<StatusCode> {
    state.catalog.delete_song(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn play_song(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<StatusCode> {
    state.catalog.play_song(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
