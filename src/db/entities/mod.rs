pub mod artist;
pub mod album;
pub mod song;

pub use artist::Entity as Artist;
pub use album::Entity as Album;
pub use song::Entity as Song;
