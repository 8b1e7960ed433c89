//! Catalog business rules.
//!
//! Every mutation checks its preconditions in a fixed order before touching
//! the store: the target row must exist, then any referenced parent must
//! exist, then field values must be valid. Multi-step operations run inside a
//! single transaction, so a dropped request leaves nothing half-applied.

use std::collections::BTreeSet;

use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend,
    IsolationLevel, TransactionTrait,
};
use tracing::{debug, info, warn};

use crate::db::entities::{album, artist, song};
use crate::db::repositories::{AlbumRepository, ArtistRepository, SongRepository};
use crate::error::{AppError, Result};
use crate::services::projection::{
    index_albums, index_artists, project_album, project_albums, project_songs, AlbumIndex,
    AlbumView, ArtistIndex, SongView,
};

#[derive(Clone)]
pub struct CatalogService {
    db: DatabaseConnection,
}

impl CatalogService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens the transaction a projected read runs in.
    ///
    /// Postgres defaults to READ COMMITTED, where each statement sees a fresh
    /// snapshot; REPEATABLE READ pins one snapshot for the rows and their
    /// parents. SQLite read transactions already see a single snapshot and
    /// reject isolation settings.
    async fn snapshot(&self) -> Result<DatabaseTransaction> {
        let txn = match self.db.get_database_backend() {
            DbBackend::Sqlite => self.db.begin().await?,
            _ => {
                self.db
                    .begin_with_config(
                        Some(IsolationLevel::RepeatableRead),
                        Some(AccessMode::ReadOnly),
                    )
                    .await?
            }
        };
        Ok(txn)
    }

    // ------------------------------------------------------------------
    // Artists
    // ------------------------------------------------------------------

    pub async fn create_artist(&self, nombre: &str) -> Result<artist::Model> {
        validate_nombre(nombre)?;

        let artist = ArtistRepository::new(&self.db).create(nombre).await?;
        info!("Created artist {} ({})", artist.id, artist.nombre);
        Ok(artist)
    }

    pub async fn list_artists(&self) -> Result<Vec<artist::Model>> {
        ArtistRepository::new(&self.db).list().await
    }

    pub async fn get_artist(&self, id: i32) -> Result<artist::Model> {
        ArtistRepository::new(&self.db).get(id).await
    }

    pub async fn update_artist(&self, id: i32, nombre: &str) -> Result<artist::Model> {
        let txn = self.db.begin().await?;
        let artists = ArtistRepository::new(&txn);

        let existing = artists.get(id).await?;
        validate_nombre(nombre)?;
        let artist = artists.update(existing, nombre).await?;

        txn.commit().await?;
        info!("Updated artist {}", id);
        Ok(artist)
    }

    /// Refuses to delete an artist that still owns albums.
    pub async fn delete_artist(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;

        ArtistRepository::new(&txn).get(id).await?;

        let albums = AlbumRepository::new(&txn).count_by_artist(id).await?;
        if albums > 0 {
            warn!("Refusing to delete artist {}: {} albums reference it", id, albums);
            return Err(AppError::ConstraintViolation(format!(
                "Artist {} still has {} album(s)",
                id, albums
            )));
        }

        children_block_delete(ArtistRepository::new(&txn).delete(id).await, || {
            format!("Artist {} still has albums", id)
        })?;

        txn.commit().await?;
        info!("Deleted artist {}", id);
        Ok(())
    }

    pub async fn list_artist_albums(&self, id: i32) -> Result<Vec<AlbumView>> {
        let txn = self.snapshot().await?;

        let artist = ArtistRepository::new(&txn).get(id).await?;
        let albums = AlbumRepository::new(&txn).list_by_artist(id).await?;
        let views = project_albums(&albums, &index_artists([artist]))?;

        txn.commit().await?;
        debug!("Listed {} albums of artist {}", views.len(), id);
        Ok(views)
    }

    pub async fn list_artist_songs(&self, id: i32) -> Result<Vec<SongView>> {
        let txn = self.snapshot().await?;

        let artist = ArtistRepository::new(&txn).get(id).await?;
        let albums = AlbumRepository::new(&txn).list_by_artist(id).await?;
        let album_ids = albums.iter().map(|a| a.id).collect();
        let songs = SongRepository::new(&txn).list_by_albums(album_ids).await?;
        let views = project_songs(&songs, &index_albums(albums), &index_artists([artist]))?;

        txn.commit().await?;
        debug!("Listed {} songs of artist {}", views.len(), id);
        Ok(views)
    }

    // ------------------------------------------------------------------
    // Albums
    // ------------------------------------------------------------------

    pub async fn list_albums(&self) -> Result<Vec<AlbumView>> {
        let txn = self.snapshot().await?;

        let albums = AlbumRepository::new(&txn).list().await?;
        let artists = artist_index(&txn, albums.iter()).await?;
        let views = project_albums(&albums, &artists)?;

        txn.commit().await?;
        debug!("Listed {} albums", views.len());
        Ok(views)
    }

    pub async fn get_album(&self, id: i32) -> Result<AlbumView> {
        let txn = self.snapshot().await?;

        let album = AlbumRepository::new(&txn).get(id).await?;
        let artists = artist_index(&txn, std::iter::once(&album)).await?;
        let view = project_album(&album, &artists)?;

        txn.commit().await?;
        Ok(view)
    }

    pub async fn create_album(&self, nombre: &str, artista: i32) -> Result<album::Model> {
        let txn = self.db.begin().await?;

        ensure_artist_exists(&txn, artista).await?;
        validate_nombre(nombre)?;
        let album = AlbumRepository::new(&txn).create(nombre, artista).await?;

        txn.commit().await?;
        info!("Created album {} ({}) for artist {}", album.id, album.nombre, artista);
        Ok(album)
    }

    pub async fn update_album(&self, id: i32, nombre: &str, artista: i32) -> Result<album::Model> {
        let txn = self.db.begin().await?;
        let albums = AlbumRepository::new(&txn);

        let existing = albums.get(id).await?;
        ensure_artist_exists(&txn, artista).await?;
        validate_nombre(nombre)?;
        let album = albums.update(existing, nombre, artista).await?;

        txn.commit().await?;
        info!("Updated album {}", id);
        Ok(album)
    }

    /// Deletes an album only when no song references it.
    ///
    /// The existence check, the song count and the delete share one
    /// transaction. A missing album is `NotFound`, never a constraint error.
    pub async fn delete_album(&self, id: i32) -> Result<()> {
        let txn = self.db.begin().await?;

        AlbumRepository::new(&txn).get(id).await?;

        let songs = SongRepository::new(&txn).count_by_album(id).await?;
        if songs > 0 {
            warn!("Refusing to delete album {}: {} songs reference it", id, songs);
            return Err(AppError::ConstraintViolation(format!(
                "Album {} still has {} song(s)",
                id, songs
            )));
        }

        // A song inserted by another connection after the count trips the
        // foreign key instead.
        children_block_delete(AlbumRepository::new(&txn).delete(id).await, || {
            format!("Album {} still has songs", id)
        })?;

        txn.commit().await?;
        info!("Deleted album {}", id);
        Ok(())
    }

    pub async fn list_album_songs(&self, id: i32) -> Result<Vec<SongView>> {
        let txn = self.snapshot().await?;

        let album = AlbumRepository::new(&txn).get(id).await?;
        let songs = SongRepository::new(&txn).list_by_album(id).await?;
        let artists = artist_index(&txn, std::iter::once(&album)).await?;
        let views = project_songs(&songs, &index_albums([album]), &artists)?;

        txn.commit().await?;
        debug!("Listed {} songs of album {}", views.len(), id);
        Ok(views)
    }

    // ------------------------------------------------------------------
    // Songs
    // ------------------------------------------------------------------

    pub async fn list_songs(&self) -> Result<Vec<SongView>> {
        let txn = self.snapshot().await?;

        let songs = SongRepository::new(&txn).list().await?;
        let views = project_with_parents(&txn, &songs).await?;

        txn.commit().await?;
        debug!("Listed {} songs", views.len());
        Ok(views)
    }

    pub async fn get_song(&self, id: i32) -> Result<SongView> {
        let txn = self.snapshot().await?;

        let song = SongRepository::new(&txn).get(id).await?;
        let mut views = project_with_parents(&txn, std::slice::from_ref(&song)).await?;

        txn.commit().await?;
        views
            .pop()
            .ok_or_else(|| AppError::Internal(format!("Song {} vanished during projection", id)))
    }

    /// Creates a song with a play count of zero.
    pub async fn create_song(&self, nombre: &str, duracion: i32, album: i32) -> Result<song::Model> {
        let txn = self.db.begin().await?;

        ensure_album_exists(&txn, album).await?;
        validate_nombre(nombre)?;
        validate_duracion(duracion)?;
        let song = SongRepository::new(&txn).create(nombre, duracion, album).await?;

        txn.commit().await?;
        info!("Created song {} ({}) in album {}", song.id, song.nombre, album);
        Ok(song)
    }

    /// Updates name, duration and album. The play count is preserved.
    pub async fn update_song(
        &self,
        id: i32,
        nombre: &str,
        duracion: i32,
        album: i32,
    ) -> Result<song::Model> {
        let txn = self.db.begin().await?;
        let songs = SongRepository::new(&txn);

        let existing = songs.get(id).await?;
        ensure_album_exists(&txn, album).await?;
        validate_nombre(nombre)?;
        validate_duracion(duracion)?;
        let song = songs.update(existing, nombre, duracion, album).await?;

        txn.commit().await?;
        info!("Updated song {}", id);
        Ok(song)
    }

    pub async fn delete_song(&self, id: i32) -> Result<()> {
        SongRepository::new(&self.db).delete(id).await?;
        info!("Deleted song {}", id);
        Ok(())
    }

    pub async fn play_song(&self, id: i32) -> Result<()> {
        SongRepository::new(&self.db).increment_play_count(id).await?;
        debug!("Played song {}", id);
        Ok(())
    }
}

async fn ensure_artist_exists<C: ConnectionTrait>(db: &C, id: i32) -> Result<()> {
    match ArtistRepository::new(db).find_by_id(id).await? {
        Some(_) => Ok(()),
        None => {
            warn!("Rejected reference to missing artist {}", id);
            Err(AppError::ForeignKeyViolation(format!(
                "Artist {} does not exist",
                id
            )))
        }
    }
}

async fn ensure_album_exists<C: ConnectionTrait>(db: &C, id: i32) -> Result<()> {
    match AlbumRepository::new(db).find_by_id(id).await? {
        Some(_) => Ok(()),
        None => {
            warn!("Rejected reference to missing album {}", id);
            Err(AppError::ForeignKeyViolation(format!(
                "Album {} does not exist",
                id
            )))
        }
    }
}

/// Loads the artists referenced by `albums` into an id-keyed map.
async fn artist_index<'m, C: ConnectionTrait>(
    db: &C,
    albums: impl Iterator<Item = &'m album::Model>,
) -> Result<ArtistIndex> {
    let ids: BTreeSet<i32> = albums.map(|a| a.artista).collect();
    let artists = ArtistRepository::new(db)
        .find_by_ids(ids.into_iter().collect())
        .await?;
    Ok(index_artists(artists))
}

async fn album_index<C: ConnectionTrait>(db: &C, songs: &[song::Model]) -> Result<AlbumIndex> {
    let ids: BTreeSet<i32> = songs.iter().map(|s| s.album).collect();
    let albums = AlbumRepository::new(db)
        .find_by_ids(ids.into_iter().collect())
        .await?;
    Ok(index_albums(albums))
}

async fn project_with_parents<C: ConnectionTrait>(
    db: &C,
    songs: &[song::Model],
) -> Result<Vec<SongView>> {
    let albums = album_index(db, songs).await?;
    let artists = artist_index(db, albums.values()).await?;
    project_songs(songs, &albums, &artists)
}

/// A delete refused by the store's foreign key means children appeared
/// after the count was taken.
fn children_block_delete(result: Result<()>, message: impl FnOnce() -> String) -> Result<()> {
    match result {
        Err(AppError::ForeignKeyViolation(_)) => Err(AppError::ConstraintViolation(message())),
        other => other,
    }
}

fn validate_nombre(nombre: &str) -> Result<()> {
    if nombre.trim().is_empty() {
        return Err(AppError::Validation("nombre must not be blank".to_string()));
    }
    Ok(())
}

fn validate_duracion(duracion: i32) -> Result<()> {
    if duracion < 0 {
        return Err(AppError::Validation(format!(
            "duracion must not be negative, got {}",
            duracion
        )));
    }
    Ok(())
}
