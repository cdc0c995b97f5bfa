//! Star-schema warehouse: row models, schema text and the SQLite store.

mod models;
mod schema;
mod store;

pub use models::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
pub use store::Warehouse;
