pub mod albums;
pub mod artists;
pub mod extract;
pub mod health;
pub mod songs;

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/", get(health::health_check))

        // Artist endpoints
        .route("/artistas", get(artists::list_artists).post(artists::create_artist))
        .route(
            "/artistas/:id",
            get(artists::get_artist)
                .put(artists::update_artist)
                .delete(artists::delete_artist),
        )
        .route("/artistas/:id/albumes", get(artists::list_artist_albums))
        .route("/artistas/:id/canciones", get(artists::list_artist_songs))

        // Album endpoints
        .route("/albumes", get(albums::list_albums).post(albums::create_album))
        .route(
            "/albumes/:id",
            get(albums::get_album)
                .put(albums::update_album)
                .delete(albums::delete_album),
        )
        .route("/albumes/:id/canciones", get(albums::list_album_songs))

        // Song endpoints
        .route("/canciones", get(songs::list_songs).post(songs::create_song))
        .route(
            "/canciones/:id",
            get(songs::get_song)
                .put(songs::update_song)
                .delete(songs::delete_song),
        )
        .route("/canciones/:id/reproducir", put(songs::play_song))
}

/// Full application router with middleware.
pub fn create_router(state: AppState) -> Router {
    api_routes()
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
