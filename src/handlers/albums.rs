use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    db::entities::album,
    error::Result,
    handlers::extract::{JsonBody, PathParam},
    services::{AlbumView, SongView},
    state::AppState,
};

/// Body of `POST /albumes` and `PUT /albumes/:id`.
#[derive(Deserialize)]
pub struct AlbumRequest {
    pub nombre: String,
    pub artista: i32,
}

pub async fn list_albums(State(state): State<AppState>) -> Result<Json<Vec<AlbumView>>> {
    Ok(Json(state.catalog.list_albums().await?))
}

pub async fn get_album(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<AlbumView>> {
    Ok(Json(state.catalog.get_album(id).await?))
}

/// Responds with the raw row, `artista` included as an id.
pub async fn create_album(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<AlbumRequest>,
) -> Result<(StatusCode, Json<album::Model>)> {
    let album = state
        .catalog
        .create_album(&payload.nombre, payload.artista)
        .await?;
    Ok((StatusCode::CREATED, Json(album)))
}

pub async fn update_album(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<AlbumRequest>,
) -> Result<Json<album::Model>> {
    let album = state
        .catalog
        .update_album(id, &payload.nombre, payload.artista)
        .await?;
    Ok(Json(album))
}

pub async fn delete_album(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<StatusCode> {
    state.catalog.delete_album(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_album_songs(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<Vec<SongView>>> {
    Ok(Json(state.catalog.list_album_songs(id).await?))
}
