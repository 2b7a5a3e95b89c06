//! Rendering a whole snapshot into a directory.

use std::path::Path;

use chrono::Utc;
use purrsist_core::store::ForumStore;

use crate::{
  assets,
  config::FeedSettings,
  error::{Error, Result},
  feed::{FeedEntry, FeedMeta, render_atom, render_rss},
  index::{BoardSummary, ThreadSummary, render_board_index, render_global_index},
  select::{BoardRule, select_boards},
  thread::{StyleCycle, author_name, fetch_thread, render_thread_page},
  writer::write_document,
};

/// Counters for one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
  pub boards:        usize,
  pub threads:       usize,
  pub posts:         usize,
  pub failed_writes: usize,
}

/// Renders selected boards, their threads, indexes and feeds.
pub struct SiteBuilder<'a, S> {
  store:    &'a S,
  rules:    &'a [BoardRule],
  feeds:    &'a FeedSettings,
  base_url: String,
}

impl<'a, S: ForumStore> SiteBuilder<'a, S> {
  /// `base_url` prefixes feed links; trailing slashes are dropped.
  pub fn new(store: &'a S, rules: &'a [BoardRule], feeds: &'a FeedSettings, base_url: &str) -> Self {
    Self { store, rules, feeds, base_url: base_url.trim_end_matches('/').to_string() }
  }

  /// Render into `root`. Existing files not rewritten by this pass are left
  /// in place.
  pub async fn build(&self, root: &Path) -> Result<RenderStats> {
    let generated = Utc::now();
    let mut stats = RenderStats { failed_writes: assets::install(root).await, ..Default::default() };

    let boards = self.store.list_boards().await.map_err(Error::store)?;
    let selections = select_boards(boards, self.rules);
    tracing::info!(selected = selections.len(), "boards selected");

    let mut styles = StyleCycle::default();
    let mut entries = Vec::new();
    let mut listed_boards = Vec::new();

    for selection in &selections {
      let board = &selection.board;
      let dir = root.join(selection.fingerprint());

      let threads = self.store.list_threads(&board.fingerprint).await.map_err(Error::store)?;
      let threads = selection.pick_threads(threads);

      let mut listed = Vec::with_capacity(threads.len());
      for thread in threads {
        let view = fetch_thread(self.store, thread).await?;
        let page = render_thread_page(board, &view, &mut styles, generated)?;
        let path = dir.join(&view.thread().fingerprint).join("index.html");

        if !write_document(&page, &path).await {
          stats.failed_writes += 1;
          continue;
        }
        tracing::debug!(board = %board.fingerprint, thread = %view.thread().fingerprint, posts = view.post_count(), "thread rendered");

        entries.push(FeedEntry::for_thread(selection.fingerprint(), &board.name, &view, &self.base_url));
        let summary = ThreadSummary::from(&view);
        stats.posts += summary.posts;
        listed.push(summary);
      }

      if listed.is_empty() {
        tracing::info!(board = %board.fingerprint, name = %board.name, "no threads rendered, skipping board");
        continue;
      }

      let owner = author_name(self.store, &board.owner_fingerprint).await?;
      let index = render_board_index(board, owner.as_deref(), &listed, generated)?;
      if !write_document(&index, &dir.join("index.html")).await {
        stats.failed_writes += 1;
      }

      tracing::info!(board = %board.fingerprint, name = %board.name, threads = listed.len(), "board rendered");
      stats.boards += 1;
      stats.threads += listed.len();
      listed_boards.push(BoardSummary {
        fingerprint: selection.fingerprint().to_string(),
        name:        board.name.clone(),
        description: board.description.clone(),
        threads:     listed.len(),
      });
    }

    let index = render_global_index(&listed_boards, generated)?;
    if !write_document(&index, &root.join("index.html")).await {
      stats.failed_writes += 1;
    }

    let meta = FeedMeta { title: &self.feeds.title, base_url: &self.base_url, generated };
    if self.feeds.atom && !write_document(&render_atom(&meta, &entries)?, &root.join("atom.xml")).await {
      stats.failed_writes += 1;
    }
    if self.feeds.rss && !write_document(&render_rss(&meta, &entries)?, &root.join("rss.xml")).await {
      stats.failed_writes += 1;
    }

    Ok(stats)
  }
}
