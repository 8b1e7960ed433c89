//! Row-level access to the catalog tables.
//!
//! Repositories borrow any sea-orm connection, so the same calls run against
//! the pool or inside a `DatabaseTransaction`. They translate typed calls into
//! queries and rows into models; business rules live in `services::catalog`.

use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::db::entities::{album, artist, song};
use crate::error::{AppError, Result};

pub struct ArtistRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ArtistRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, nombre: &str) -> Result<artist::Model> {
        let artist = artist::ActiveModel {
            nombre: Set(nombre.to_string()),
            ..Default::default()
        };
        Ok(artist.insert(self.db).await?)
    }

    pub async fn list(&self) -> Result<Vec<artist::Model>> {
        Ok(artist::Entity::find()
            .order_by_asc(artist::Column::Id)
            .all(self.db)
            .await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<artist::Model>> {
        Ok(artist::Entity::find_by_id(id).one(self.db).await?)
    }

    pub async fn get(&self, id: i32) -> Result<artist::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Artist {} not found", id)))
    }

    pub async fn find_by_ids(&self, ids: Vec<i32>) -> Result<Vec<artist::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(artist::Entity::find()
            .filter(artist::Column::Id.is_in(ids))
            .all(self.db)
            .await?)
    }

    /// Writes new values over a row the caller has already loaded.
    pub async fn update(&self, existing: artist::Model, nombre: &str) -> Result<artist::Model> {
        let mut active: artist::ActiveModel = existing.into();
        active.nombre = Set(nombre.to_string());
        Ok(active.update(self.db).await?)
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = artist::Entity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Artist {} not found", id)));
        }
        Ok(())
    }
}

pub struct AlbumRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AlbumRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, nombre: &str, artista: i32) -> Result<album::Model> {
        let album = album::ActiveModel {
            nombre: Set(nombre.to_string()),
            artista: Set(artista),
            ..Default::default()
        };
        Ok(album.insert(self.db).await?)
    }

    pub async fn list(&self) -> Result<Vec<album::Model>> {
        Ok(album::Entity::find()
            .order_by_asc(album::Column::Id)
            .all(self.db)
            .await?)
    }

    pub async fn list_by_artist(&self, artista: i32) -> Result<Vec<album::Model>> {
        Ok(album::Entity::find()
            .filter(album::Column::Artista.eq(artista))
            .order_by_asc(album::Column::Id)
            .all(self.db)
            .await?)
    }

    pub async fn count_by_artist(&self, artista: i32) -> Result<u64> {
        Ok(album::Entity::find()
            .filter(album::Column::Artista.eq(artista))
            .count(self.db)
            .await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<album::Model>> {
        Ok(album::Entity::find_by_id(id).one(self.db).await?)
    }

    pub async fn get(&self, id: i32) -> Result<album::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Album {} not found", id)))
    }

    pub async fn find_by_ids(&self, ids: Vec<i32>) -> Result<Vec<album::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(album::Entity::find()
            .filter(album::Column::Id.is_in(ids))
            .all(self.db)
            .await?)
    }

    pub async fn update(
        &self,
        existing: album::Model,
        nombre: &str,
        artista: i32,
    ) -> Result<album::Model> {
        let mut active: album::ActiveModel = existing.into();
        active.nombre = Set(nombre.to_string());
        active.artista = Set(artista);
        Ok(active.update(self.db).await?)
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = album::Entity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Album {} not found", id)));
        }
        Ok(())
    }
}

pub struct SongRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SongRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Insert a song. The play count always starts at zero.
    pub async fn create(&self, nombre: &str, duracion: i32, album: i32) -> Result<song::Model> {
        let song = song::ActiveModel {
            nombre: Set(nombre.to_string()),
            duracion: Set(duracion),
            reproducciones: Set(0),
            album: Set(album),
            ..Default::default()
        };
        Ok(song.insert(self.db).await?)
    }

    pub async fn list(&self) -> Result<Vec<song::Model>> {
        Ok(song::Entity::find()
            .order_by_asc(song::Column::Id)
            .all(self.db)
            .await?)
    }

    pub async fn list_by_album(&self, album: i32) -> Result<Vec<song::Model>> {
        Ok(song::Entity::find()
            .filter(song::Column::Album.eq(album))
            .order_by_asc(song::Column::Id)
            .all(self.db)
            .await?)
    }

    pub async fn list_by_albums(&self, albums: Vec<i32>) -> Result<Vec<song::Model>> {
        if albums.is_empty() {
            return Ok(Vec::new());
        }
        Ok(song::Entity::find()
            .filter(song::Column::Album.is_in(albums))
            .order_by_asc(song::Column::Id)
            .all(self.db)
            .await?)
    }

    pub async fn count_by_album(&self, album: i32) -> Result<u64> {
        Ok(song::Entity::find()
            .filter(song::Column::Album.eq(album))
            .count(self.db)
            .await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<song::Model>> {
        Ok(song::Entity::find_by_id(id).one(self.db).await?)
    }

    pub async fn get(&self, id: i32) -> Result<song::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Song {} not found", id)))
    }

    /// Update the editable fields. `reproducciones` is left untouched.
    pub async fn update(
        &self,
        existing: song::Model,
        nombre: &str,
        duracion: i32,
        album: i32,
    ) -> Result<song::Model> {
        let mut active: song::ActiveModel = existing.into();
        active.nombre = Set(nombre.to_string());
        active.duracion = Set(duracion);
        active.album = Set(album);
        Ok(active.update(self.db).await?)
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = song::Entity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Song {} not found", id)));
        }
        Ok(())
    }

    /// `UPDATE songs SET reproducciones = reproducciones + 1 WHERE id = ?`
    ///
    /// The arithmetic is evaluated by the store, so concurrent plays never
    /// overwrite each other.
    pub async fn increment_play_count(&self, id: i32) -> Result<()> {
        let result = song::Entity::update_many()
            .col_expr(
                song::Column::Reproducciones,
                Expr::col(song::Column::Reproducciones).add(1),
            )
            .filter(song::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Song {} not found", id)));
        }
        Ok(())
    }
}
