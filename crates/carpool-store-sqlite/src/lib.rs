//! SQLite backend for the car organizer roster.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on one dedicated
//! thread without blocking the async runtime. That single connection
//! serializes every transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
