use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    db::entities::artist,
    error::Result,
    handlers::extract::{JsonBody, PathParam},
    services::{AlbumView, SongView},
    state::AppState,
};

#[derive(Deserialize)]
pub struct ArtistRequest {
    pub nombre: String,
}

pub async fn list_artists(State(state): State<AppState>) -> Result<Json<Vec<artist::Model>>> {
    Ok(Json(state.catalog.list_artists().await?))
}

pub async fn get_artist(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<artist::Model>> {
    Ok(Json(state.catalog.get_artist(id).await?))
}

pub async fn create_artist(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ArtistRequest>,
) -> Result<(StatusCode, Json<artist::Model>)> {
    let artist = state.catalog.create_artist(&payload.nombre).await?;
    Ok((StatusCode::CREATED, Json(artist)))
}

pub async fn update_artist(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<ArtistRequest>,
) -> Result<Json<artist::Model>> {
    Ok(Json(state.catalog.update_artist(id, &payload.nombre).await?))
}

pub async fn delete_artist(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<StatusCode> {
    state.catalog.delete_artist(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_artist_albums(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<Vec<AlbumView>>> {
    Ok(Json(state.catalog.list_artist_albums(id).await?))
}

pub async fn list_artist_songs(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> Result<Json<Vec<SongView>>> {
    Ok(Json(state.catalog.list_artist_songs(id).await?))
}
