//! The publish run.
//!
//! ```text
//! ResolveKey → FetchPrevious → RenderAll → AddToStore → PublishName → SwapPin
//! ```
//!
//! Steps run once, in order, with no retries. Fetching the previous snapshot
//! and removing the old remote pin may fail without stopping the run; every
//! other failure aborts it. The scratch workspace is removed either way.
//!
//! The previous snapshot lands in `<workspace>/previous` and is never merged
//! into the new one. Each run renders into an empty `<workspace>/boards`, so
//! excluded threads, dropped boards and disabled feeds disappear from the
//! published tree.

use std::{io, path::Path, time::Duration};

use purrsist_core::{
  content::{ContentStore, KeyInfo, PublishedName},
  store::ForumStore,
};
use tempfile::TempDir;

use crate::{
  config::Settings,
  error::{Error, Result, Stage},
  select::BoardRule,
  site::{RenderStats, SiteBuilder},
};

/// What FetchPrevious found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviousSnapshot {
  /// The last published tree was fetched into `<workspace>/previous`.
  Restored,
  /// Nothing usable was found.
  Empty,
}

/// How removing the old remote pin went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinRemoval {
  Removed,
  Failed(String),
}

#[derive(Debug)]
pub struct PublishOutcome {
  /// Root CID of the new snapshot.
  pub cid:       String,
  pub key:       KeyInfo,
  pub published: PublishedName,
  pub previous:  PreviousSnapshot,
  pub stats:     RenderStats,
  /// `None` when remote pinning is disabled.
  pub pin:       Option<PinRemoval>,
}

pub struct Publisher<'a, S, C> {
  store:    &'a S,
  content:  &'a C,
  settings: &'a Settings,
  rules:    Vec<BoardRule>,
}

impl<'a, S, C> Publisher<'a, S, C>
where
  S: ForumStore,
  C: ContentStore,
{
  pub fn new(store: &'a S, content: &'a C, settings: &'a Settings) -> Result<Self> {
    Ok(Self { store, content, settings, rules: settings.rules()? })
  }

  pub async fn run(&self) -> Result<PublishOutcome> {
    let key = self.resolve_key().await?;

    let workspace = self.workspace()?;
    let previous = self.fetch_previous(&key, &workspace.path().join("previous")).await?;

    let boards = workspace.path().join("boards");
    tokio::fs::create_dir_all(&boards).await?;

    let base_url = match &self.settings.feeds.base_url {
      Some(url) => url.clone(),
      None => format!("https://dweb.link/ipns/{}", key.id),
    };
    let stats = SiteBuilder::new(self.store, &self.rules, &self.settings.feeds, &base_url)
      .build(&boards)
      .await?;
    tracing::info!(
      boards = stats.boards,
      threads = stats.threads,
      posts = stats.posts,
      failed_writes = stats.failed_writes,
      "snapshot rendered"
    );

    let cid = self.add_to_store(&boards).await?;
    let published = self.publish_name(&cid, &key).await?;
    let pin = self.swap_pin(&cid).await?;

    if let Err(e) = workspace.close() {
      tracing::warn!(error = %e, "failed to remove workspace");
    }

    Ok(PublishOutcome { cid, key, published, previous, stats, pin })
  }

  fn workspace(&self) -> Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("aetherp");
    let dir = match &self.settings.scratch_dir {
      Some(parent) => builder.tempdir_in(parent)?,
      None => builder.tempdir()?,
    };
    tracing::debug!(path = %dir.path().display(), "workspace created");
    Ok(dir)
  }

  /// Find the configured key, generating it if it does not exist yet.
  async fn resolve_key(&self) -> Result<KeyInfo> {
    let name = &self.settings.ipfs.ipns_key;
    let keys = self
      .content
      .key_list()
      .await
      .map_err(|e| Error::content(Stage::ResolveKey, e))?;

    if let Some(key) = keys.into_iter().find(|k| &k.name == name) {
      tracing::debug!(key = %key.name, id = %key.id, "using existing key");
      return Ok(key);
    }

    let key = self
      .content
      .key_gen(name)
      .await
      .map_err(|e| Error::content(Stage::ResolveKey, e))?;
    tracing::info!(key = %key.name, id = %key.id, "generated key");
    Ok(key)
  }

  /// Copy the tree currently published under `key` into `dest`. Anything
  /// left at `dest` after a failed or non-directory fetch is removed.
  async fn fetch_previous(&self, key: &KeyInfo, dest: &Path) -> Result<PreviousSnapshot> {
    let path = format!("/ipns/{}", key.id);
    let previous = match self.content.get(&path, dest).await {
      Ok(()) if dest.is_dir() => {
        tracing::info!(%path, "previous snapshot restored");
        PreviousSnapshot::Restored
      }
      Ok(()) => {
        tracing::warn!(%path, "previous snapshot is not a directory, discarding it");
        discard(dest).await?;
        PreviousSnapshot::Empty
      }
      Err(e) => {
        tracing::warn!(%path, error = %e, "could not fetch previous snapshot, continuing without it");
        discard(dest).await?;
        PreviousSnapshot::Empty
      }
    };
    Ok(previous)
  }

  async fn add_to_store(&self, dir: &Path) -> Result<String> {
    let entries = self
      .content
      .add_dir(dir)
      .await
      .map_err(|e| Error::content(Stage::AddToStore, e))?;
    let root = entries.into_iter().last().ok_or_else(|| Error::EmptyAdd(dir.to_path_buf()))?;
    tracing::info!(cid = %root.cid, "snapshot added");
    Ok(root.cid)
  }

  async fn publish_name(&self, cid: &str, key: &KeyInfo) -> Result<PublishedName> {
    let path = format!("/ipfs/{cid}");
    let published = self
      .content
      .name_publish(&path, &key.name)
      .await
      .map_err(|e| Error::content(Stage::PublishName, e))?;
    tracing::info!(name = %published.name, value = %published.value, "name published");
    Ok(published)
  }

  /// Replace the remote pin with one for `cid`. Removal may fail; the new pin
  /// may not.
  async fn swap_pin(&self, cid: &str) -> Result<Option<PinRemoval>> {
    let pin = &self.settings.ipfs.pinremote;
    if !pin.enabled {
      return Ok(None);
    }

    let removal = match self.content.pin_remote_rm(&pin.service, &pin.pin_name, true).await {
      Ok(()) => PinRemoval::Removed,
      Err(e) => {
        tracing::warn!(service = %pin.service, name = %pin.pin_name, error = %e, "failed to remove old remote pin");
        PinRemoval::Failed(e.to_string())
      }
    };

    tokio::time::sleep(Duration::from_millis(pin.delay_ms)).await;

    self
      .content
      .pin_remote_add(&pin.service, cid, &pin.pin_name)
      .await
      .map_err(|e| Error::content(Stage::SwapPin, e))?;
    tracing::info!(service = %pin.service, name = %pin.pin_name, %cid, "remote pin added");
    Ok(Some(removal))
  }
}

/// Remove whatever is at `path`, if anything.
async fn discard(path: &Path) -> io::Result<()> {
  match tokio::fs::symlink_metadata(path).await {
    Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(path).await,
    Ok(_) => tokio::fs::remove_file(path).await,
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(e),
  }
}
