//! Read-only views of the Aether backend entities.
//!
//! Every entity is keyed by a fingerprint, an opaque content identifier
//! that is compared for equality and never interpreted. The archiver never
//! writes any of these back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Entities ────────────────────────────────────────────────────────────────

/// A community ("board"): a named discussion space containing threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
  pub fingerprint:       String,
  pub name:              String,
  pub owner_fingerprint: String,
  pub description:       String,
  pub creation:          DateTime<Utc>,
  pub language:          String,
  pub local_arrival:     DateTime<Utc>,
}

/// The root of a reply tree inside a [`Board`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thread {
  pub fingerprint:       String,
  pub board_fingerprint: String,
  pub name:              String,
  pub body:              String,
  /// External media or page the thread links to, if any.
  pub link:              Option<String>,
  pub owner_fingerprint: String,
  pub local_arrival:     DateTime<Utc>,
}

/// A reply, attached either directly under a thread or under another post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
  pub fingerprint:        String,
  pub board_fingerprint:  String,
  pub thread_fingerprint: String,
  /// The thread's own fingerprint for top-level replies, otherwise the
  /// fingerprint of the post being replied to.
  pub parent_fingerprint: String,
  pub body:               String,
  pub owner_fingerprint:  String,
  pub creation:           DateTime<Utc>,
  pub local_arrival:      DateTime<Utc>,
}

impl Post {
  pub fn is_top_level(&self) -> bool { self.parent_fingerprint == self.thread_fingerprint }
}

/// An endorsement or opposition record targeting a thread or post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
  pub board_fingerprint:  String,
  pub thread_fingerprint: String,
  /// The thread or post being voted on.
  pub target_fingerprint: String,
  /// Polarity code; see [`crate::vote`].
  pub kind:               i64,
  /// Vote category; only [`crate::vote::CLASS_SIGNAL`] counts toward scores.
  pub class:              i64,
}

/// An author identity, used only to resolve display names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicKey {
  pub fingerprint: String,
  pub name:        String,
  pub key_type:    String,
  pub public_key:  String,
}

// ─── Displayable ─────────────────────────────────────────────────────────────

/// Anything rendered as an authored message: threads and posts alike.
pub trait Displayable {
  fn fingerprint(&self) -> &str;
  fn body(&self) -> &str;
  fn owner_fingerprint(&self) -> &str;
  fn local_arrival(&self) -> DateTime<Utc>;
}

impl Displayable for Thread {
  fn fingerprint(&self) -> &str { &self.fingerprint }

  fn body(&self) -> &str { &self.body }

  fn owner_fingerprint(&self) -> &str { &self.owner_fingerprint }

  fn local_arrival(&self) -> DateTime<Utc> { self.local_arrival }
}

impl Displayable for Post {
  fn fingerprint(&self) -> &str { &self.fingerprint }

  fn body(&self) -> &str { &self.body }

  fn owner_fingerprint(&self) -> &str { &self.owner_fingerprint }

  fn local_arrival(&self) -> DateTime<Utc> { self.local_arrival }
}
