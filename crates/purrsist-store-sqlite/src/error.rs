//! Error type for `purrsist-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("column {column} has unexpected type {found}")]
  ColumnType {
    column: &'static str,
    found:  &'static str,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
