//! Error types for the archiver.

use std::{fmt, path::PathBuf};

use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Publish steps whose content-store failure aborts the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  ResolveKey,
  AddToStore,
  PublishName,
  SwapPin,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Stage::ResolveKey => "resolve key",
      Stage::AddToStore => "add to content store",
      Stage::PublishName => "publish name",
      Stage::SwapPin => "swap remote pin",
    })
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("invalid pattern {pattern:?}: {source}")]
  Pattern {
    pattern: String,
    #[source]
    source:  regex::Error,
  },

  #[error("store error: {0}")]
  Store(#[source] BoxError),

  /// A content-store call failed. `source` is the backend's own error.
  #[error("{stage} failed: {source}")]
  Content {
    stage:  Stage,
    #[source]
    source: BoxError,
  },

  #[error("content store returned no entries when adding {0:?}")]
  EmptyAdd(PathBuf),

  #[error("reply cycle in thread {thread}: post {post} reached twice")]
  ReplyCycle { thread: String, post: String },

  #[error("markup error: {0}")]
  Markup(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl Error {
  pub(crate) fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }

  pub(crate) fn content<E>(stage: Stage, e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Content { stage, source: Box::new(e) }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use std::error::Error as _;

  use super::*;
  use crate::testing::FakeError;

  #[test]
  fn content_errors_name_their_stage_and_keep_the_source() {
    let err = Error::content(Stage::PublishName, FakeError("key not found".into()));
    assert_eq!(err.to_string(), "publish name failed: key not found");
    assert_eq!(err.source().unwrap().to_string(), "key not found");
    assert!(matches!(err, Error::Content { stage: Stage::PublishName, .. }));
  }
}
