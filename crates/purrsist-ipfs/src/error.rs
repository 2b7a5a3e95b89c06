//! Error type for `purrsist-ipfs`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  /// The daemon answered with a non-success status.
  #[error("{endpoint} → {status}: {message}")]
  Api {
    endpoint: &'static str,
    status:   u16,
    message:  String,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid api multiaddr {0:?}")]
  InvalidMultiaddr(String),

  /// A directory listing contained a name that would escape the destination.
  #[error("refusing to materialise unsafe path component {0:?}")]
  UnsafePath(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
