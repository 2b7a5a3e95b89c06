//! Atom and RSS feeds of rendered threads.

use chrono::{DateTime, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::{
  classify::render_body,
  error::Result,
  html::Document,
  layout::{AETHER_URL, GENERATOR, author_label},
  thread::ThreadView,
};

/// One feed item per rendered thread.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
  pub id:           String,
  pub title:        String,
  pub link:         String,
  pub author:       String,
  pub published:    DateTime<Utc>,
  /// Rendered HTML of the thread body.
  pub content_html: String,
  /// The thread's external link.
  pub source:       Option<String>,
}

impl FeedEntry {
  /// `board` is the directory the thread page was written under.
  pub fn for_thread(board: &str, board_name: &str, view: &ThreadView, base_url: &str) -> Self {
    let thread = view.thread();
    let base = base_url.trim_end_matches('/');
    Self {
      id:           entry_id(board, &thread.fingerprint),
      title:        strip_control(&format!("{board_name}: {}", thread.name)),
      link:         format!("{base}/{board}/{}/index.html", thread.fingerprint),
      author:       author_label(view.root.author.as_deref()),
      published:    thread.local_arrival,
      content_html: render_body(&strip_control(&thread.body)),
      source:       thread.link.clone(),
    }
  }
}

/// Stable entry id: `urn:sha256:` and the hex digest of `"{board}/{thread}"`.
pub fn entry_id(board: &str, thread: &str) -> String {
  let digest = Sha256::digest(format!("{board}/{thread}").as_bytes());
  format!("urn:sha256:{}", hex::encode(digest))
}

/// Remove C0 and C1 control characters, line breaks included.
pub fn strip_control(text: &str) -> String {
  text
    .chars()
    .filter(|c| !matches!(*c, '\u{0}'..='\u{1f}' | '\u{7f}'..='\u{9f}'))
    .collect()
}

/// Feed-level metadata.
#[derive(Debug, Clone)]
pub struct FeedMeta<'a> {
  pub title:     &'a str,
  /// Snapshot root URL, without a trailing slash.
  pub base_url:  &'a str,
  pub generated: DateTime<Utc>,
}

impl FeedMeta<'_> {
  fn updated(&self, entries: &[FeedEntry]) -> DateTime<Utc> {
    entries.iter().map(|e| e.published).max().unwrap_or(self.generated)
  }
}

fn rfc3339(at: DateTime<Utc>) -> String { at.to_rfc3339_opts(SecondsFormat::Secs, true) }

/// Atom 1.0 (`atom.xml`).
pub fn render_atom(meta: &FeedMeta<'_>, entries: &[FeedEntry]) -> Result<String> {
  let self_link = format!("{}/atom.xml", meta.base_url);
  let home = format!("{}/index.html", meta.base_url);
  let updated = rfc3339(meta.updated(entries));

  let mut doc = Document::xml()?;
  doc.elem("feed", &[("xmlns", "http://www.w3.org/2005/Atom")], |doc| {
    doc.text_elem("id", &[], meta.base_url)?;
    doc.text_elem("title", &[], meta.title)?;
    doc.text_elem("updated", &[], &updated)?;
    doc.void("link", &[("rel", "self"), ("href", self_link.as_str())])?;
    doc.void("link", &[("rel", "alternate"), ("href", home.as_str())])?;
    doc.text_elem("generator", &[("uri", AETHER_URL)], GENERATOR)?;

    for entry in entries {
      let published = rfc3339(entry.published);
      doc.elem("entry", &[], |doc| {
        doc.text_elem("id", &[], &entry.id)?;
        doc.text_elem("title", &[], &entry.title)?;
        doc.void("link", &[("rel", "alternate"), ("href", entry.link.as_str())])?;
        if let Some(source) = &entry.source {
          doc.void("link", &[("rel", "related"), ("href", source.as_str())])?;
        }
        doc.text_elem("published", &[], &published)?;
        doc.text_elem("updated", &[], &published)?;
        doc.elem("author", &[], |doc| doc.text_elem("name", &[], &entry.author))?;
        doc.text_elem("content", &[("type", "html")], &entry.content_html)
      })?;
    }
    Ok(())
  })?;

  Ok(doc.finish())
}

/// RSS 2.0 (`rss.xml`).
pub fn render_rss(meta: &FeedMeta<'_>, entries: &[FeedEntry]) -> Result<String> {
  let home = format!("{}/index.html", meta.base_url);
  let built = meta.updated(entries).to_rfc2822();

  let mut doc = Document::xml()?;
  doc.elem("rss", &[("version", "2.0")], |doc| {
    doc.elem("channel", &[], |doc| {
      doc.text_elem("title", &[], meta.title)?;
      doc.text_elem("link", &[], &home)?;
      doc.text_elem("description", &[], meta.title)?;
      doc.text_elem("generator", &[], GENERATOR)?;
      doc.text_elem("lastBuildDate", &[], &built)?;

      for entry in entries {
        doc.elem("item", &[], |doc| {
          doc.text_elem("title", &[], &entry.title)?;
          doc.text_elem("link", &[], &entry.link)?;
          doc.text_elem("guid", &[("isPermaLink", "false")], &entry.id)?;
          doc.text_elem("pubDate", &[], &entry.published.to_rfc2822())?;
          doc.text_elem("description", &[], &entry.content_html)?;
          if let Some(source) = &entry.source {
            doc.text_elem("source", &[("url", source.as_str())], source)?;
          }
          Ok(())
        })?;
      }
      Ok(())
    })
  })?;

  Ok(doc.finish())
}
