//! Test utilities for SpoTICfy
//!
//! Provides helpers for creating isolated test environments with:
//! - In-memory SQLite databases (one per test)
//! - AppState factories
//! - Catalog row factories and the canonical seed fixture

use migration::MigratorTrait;
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};

use crate::{
    config::{Config, LogFormat},
    db::entities::{album, artist, song},
    state::AppState,
};

/// Setup an in-memory SQLite database with all migrations applied
///
/// Each call creates a fresh, isolated database perfect for parallel testing
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    // Run all migrations
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Create a test configuration with sensible defaults
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 3000,
        database_max_connections: 1,
        database_connect_timeout_secs: 8,
        log_format: LogFormat::Pretty,
    }
}

/// Create a complete test AppState with an isolated database
pub async fn setup_test_app_state() -> AppState {
    let db = setup_test_db().await;
    AppState::new(db, test_config())
}

// ============================================================================
// Test Data Factories
// ============================================================================

/// Insert an artist row directly, bypassing business rules
pub async fn create_test_artist(db: &DatabaseConnection, nombre: &str) -> artist::Model {
    let artist = artist::ActiveModel {
        nombre: Set(nombre.to_string()),
        ..Default::default()
    };

    artist.insert(db).await.expect("Failed to insert test artist")
}

/// Insert an album row directly, bypassing business rules
pub async fn create_test_album(
    db: &DatabaseConnection,
    artista: i32,
    nombre: &str,
) -> album::Model {
    let album = album::ActiveModel {
        nombre: Set(nombre.to_string()),
        artista: Set(artista),
        ..Default::default()
    };

    album.insert(db).await.expect("Failed to insert test album")
}

/// Insert a song row directly with an arbitrary play count
pub async fn create_test_song(
    db: &DatabaseConnection,
    album: i32,
    nombre: &str,
    duracion: i32,
    reproducciones: i32,
) -> song::Model {
    let song = song::ActiveModel {
        nombre: Set(nombre.to_string()),
        duracion: Set(duracion),
        reproducciones: Set(reproducciones),
        album: Set(album),
        ..Default::default()
    };

    song.insert(db).await.expect("Failed to insert test song")
}

/// Artists and albums of the canonical fixture
///
/// | id | artista | album                 |
/// |----|---------|-----------------------|
/// | 1  | Lean    | La Base de los Datos  |
/// | 2  | Lean    | Ya lo sabIA           |
/// | 3  | Nacho   | No es Java            |
pub async fn seed_artists_and_albums(db: &DatabaseConnection) {
    let lean = create_test_artist(db, "Lean").await;
    let nacho = create_test_artist(db, "Nacho").await;

    create_test_album(db, lean.id, "La Base de los Datos").await;
    create_test_album(db, lean.id, "Ya lo sabIA").await;
    create_test_album(db, nacho.id, "No es Java").await;
}

/// Full canonical fixture: artists, albums and three songs
///
/// | id | cancion                    | duracion | reproducciones | album |
/// |----|----------------------------|----------|----------------|-------|
/// | 1  | Momento pgAdmin ft. Nacho  | 180      | 100            | 1     |
/// | 2  | Sos el WHERE de mi SELECT  | 200      | 150            | 3     |
/// | 3  | Es JavaScript              | 240      | 200            | 1     |
pub async fn seed_catalog(db: &DatabaseConnection) {
    seed_artists_and_albums(db).await;

    create_test_song(db, 1, "Momento pgAdmin ft. Nacho", 180, 100).await;
    create_test_song(db, 3, "Sos el WHERE de mi SELECT", 200, 150).await;
    create_test_song(db, 1, "Es JavaScript", 240, 200).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::EntityTrait;

    #[tokio::test]
    async fn test_setup_test_db() {
        let db = setup_test_db().await;
        // Verify we can query the database (it has tables from migrations)
        let artists = artist::Entity::find().all(&db).await.unwrap();
        assert_eq!(artists.len(), 0);
    }

    #[tokio::test]
    async fn test_seed_catalog() {
        let db = setup_test_db().await;
        seed_catalog(&db).await;

        assert_eq!(artist::Entity::find().all(&db).await.unwrap().len(), 2);
        assert_eq!(album::Entity::find().all(&db).await.unwrap().len(), 3);

        assert_eq!(song::Entity::find().all(&db).await.unwrap().len(), 3);

        let es_javascript = song::Entity::find_by_id(3).one(&db).await.unwrap().unwrap();
        assert_eq!(es_javascript.nombre, "Es JavaScript");
        assert_eq!(es_javascript.reproducciones, 200);
    }

    #[tokio::test]
    async fn test_parallel_databases() {
        // Run two database setups in parallel - they should not interfere
        let (db1, db2) = tokio::join!(setup_test_db(), setup_test_db());

        let artist1 = create_test_artist(&db1, "Artist 1").await;
        let artist2 = create_test_artist(&db2, "Artist 2").await;

        // Both should be ID 1 (separate databases)
        assert_eq!(artist1.id, 1);
        assert_eq!(artist2.id, 1);
    }
}
