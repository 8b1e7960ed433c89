pub mod catalog;
pub mod projection;

pub use catalog::CatalogService;
pub use projection::{AlbumView, SongView};
