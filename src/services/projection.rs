//! Denormalized read shapes.
//!
//! Clients never see raw foreign keys on reads: albums carry their artist's
//! name and songs carry both their album's and their artist's names. Lookups
//! go through id-keyed maps built once per request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::db::entities::{album, artist, song};
use crate::error::{AppError, Result};

pub type ArtistIndex = HashMap<i32, artist::Model>;
pub type AlbumIndex = HashMap<i32, album::Model>;

/// `{id, nombre, nombre_artista}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumView {
    pub id: i32,
    pub nombre: String,
    pub nombre_artista: String,
}

/// `{id, nombre, duracion, reproducciones, nombre_artista, nombre_album}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongView {
    pub id: i32,
    pub nombre: String,
    pub duracion: i32,
    pub reproducciones: i32,
    pub nombre_artista: String,
    pub nombre_album: String,
}

pub fn index_artists(artists: impl IntoIterator<Item = artist::Model>) -> ArtistIndex {
    artists.into_iter().map(|a| (a.id, a)).collect()
}

pub fn index_albums(albums: impl IntoIterator<Item = album::Model>) -> AlbumIndex {
    albums.into_iter().map(|a| (a.id, a)).collect()
}

pub fn project_album(album: &album::Model, artists: &ArtistIndex) -> Result<AlbumView> {
    let artist = artists.get(&album.artista).ok_or_else(|| {
        AppError::Internal(format!(
            "Album {} references missing artist {}",
            album.id, album.artista
        ))
    })?;

    Ok(AlbumView {
        id: album.id,
        nombre: album.nombre.clone(),
        nombre_artista: artist.nombre.clone(),
    })
}

/// Resolves the album through `song.album`, then the artist through that
/// album's `artista`.
pub fn project_song(
    song: &song::Model,
    albums: &AlbumIndex,
    artists: &ArtistIndex,
) -> Result<SongView> {
    let album = albums.get(&song.album).ok_or_else(|| {
        AppError::Internal(format!(
            "Song {} references missing album {}",
            song.id, song.album
        ))
    })?;
    let artist = artists.get(&album.artista).ok_or_else(|| {
        AppError::Internal(format!(
            "Album {} references missing artist {}",
            album.id, album.artista
        ))
    })?;

    Ok(SongView {
        id: song.id,
        nombre: song.nombre.clone(),
        duracion: song.duracion,
        reproducciones: song.reproducciones,
        nombre_artista: artist.nombre.clone(),
        nombre_album: album.nombre.clone(),
    })
}

pub fn project_albums(albums: &[album::Model], artists: &ArtistIndex) -> Result<Vec<AlbumView>> {
    albums.iter().map(|a| project_album(a, artists)).collect()
}

pub fn project_songs(
    songs: &[song::Model],
    albums: &AlbumIndex,
    artists: &ArtistIndex,
) -> Result<Vec<SongView>> {
    songs
        .iter()
        .map(|s| project_song(s, albums, artists))
        .collect()
}
