//! SQLite-backed storage collaborator.

pub mod connection;
pub mod schema;
pub mod store;

pub use connection::{Connection, DbPath};
pub use store::SqliteStore;
