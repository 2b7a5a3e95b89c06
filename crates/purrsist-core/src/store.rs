//! The `ForumStore` trait: read access to an Aether snapshot.
//!
//! The trait is implemented by storage backends (e.g.
//! `purrsist-store-sqlite`). The renderer depends on this abstraction, not on
//! any concrete backend.
//!
//! Every method is a single exact-match lookup. There are no joins: walking
//! a reply tree or resolving an author is done by the caller issuing
//! successive lookups.

use std::future::Future;

use crate::model::{Board, Post, PublicKey, Thread, Vote};

/// Read-only query capability over a forum snapshot.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait ForumStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Every board, ordered by name.
  fn list_boards(&self) -> impl Future<Output = Result<Vec<Board>, Self::Error>> + Send + '_;

  /// Threads of a board, newest local arrival first.
  fn list_threads<'a>(
    &'a self,
    board: &'a str,
  ) -> impl Future<Output = Result<Vec<Thread>, Self::Error>> + Send + 'a;

  /// Posts of `thread` whose parent is `parent`.
  ///
  /// Pass the thread's own fingerprint as `parent` to get top-level replies.
  fn list_replies<'a>(
    &'a self,
    thread: &'a str,
    parent: &'a str,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + 'a;

  /// Votes cast on a thread or post.
  fn list_votes<'a>(
    &'a self,
    target: &'a str,
  ) -> impl Future<Output = Result<Vec<Vote>, Self::Error>> + Send + 'a;

  /// Look up an author key. Returns `None` if the key is unknown.
  fn get_public_key<'a>(
    &'a self,
    fingerprint: &'a str,
  ) -> impl Future<Output = Result<Option<PublicKey>, Self::Error>> + Send + 'a;
}
