//! The `ContentStore` trait: a content-addressed store with mutable names
//! and remote pinning.
//!
//! `purrsist-ipfs` implements it against the Kubo RPC API; the publish
//! coordinator only sees this trait.

use std::{future::Future, path::Path};

use serde::{Deserialize, Serialize};

/// A named key whose identifier doubles as a mutable name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyInfo {
  pub name: String,
  pub id:   String,
}

/// One entry of an add stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedEntry {
  /// Path of the entry relative to the parent of the added directory.
  pub path: String,
  pub cid:  String,
}

/// The result of binding a name to a content path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedName {
  pub name:  String,
  pub value: String,
}

pub trait ContentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Recursively add the directory at `dir` with CID version 1.
  ///
  /// Returns every added entry; the **last** one is the directory itself.
  /// No other ordering is guaranteed.
  fn add_dir<'a>(
    &'a self,
    dir: &'a Path,
  ) -> impl Future<Output = Result<Vec<AddedEntry>, Self::Error>> + Send + 'a;

  /// Materialise the tree addressed by `path` (e.g. `/ipns/<key>`) into
  /// `dest`, which is created as a directory.
  fn get<'a>(
    &'a self,
    path: &'a str,
    dest: &'a Path,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn key_list(&self) -> impl Future<Output = Result<Vec<KeyInfo>, Self::Error>> + Send + '_;

  /// Generate a new key called `name`.
  fn key_gen<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<KeyInfo, Self::Error>> + Send + 'a;

  /// Point the mutable name of `key` at `path` (e.g. `/ipfs/<cid>`).
  fn name_publish<'a>(
    &'a self,
    path: &'a str,
    key: &'a str,
  ) -> impl Future<Output = Result<PublishedName, Self::Error>> + Send + 'a;

  /// Remove remote pins called `name` from `service`.
  fn pin_remote_rm<'a>(
    &'a self,
    service: &'a str,
    name: &'a str,
    force: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Pin `cid` on `service` under `name`.
  fn pin_remote_add<'a>(
    &'a self,
    service: &'a str,
    cid: &'a str,
    name: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
