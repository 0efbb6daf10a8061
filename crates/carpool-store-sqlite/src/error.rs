//! Error type for `carpool-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A stored value does not fit its domain type.
  #[error("invalid {column} value in store: {value}")]
  InvalidValue { column: &'static str, value: i64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
