//! Thread pages.
//!
//! A thread is rendered in two passes. [`fetch_thread`] walks the reply tree
//! through the store and materialises a [`ThreadView`]; [`render_thread_page`]
//! turns that view into HTML without further I/O. Both passes visit nodes in
//! the same depth-first order.

use std::{collections::HashSet, future::Future, pin::Pin};

use chrono::{DateTime, Utc};
use purrsist_core::{Board, Displayable, Post, Thread, score, store::ForumStore};

use crate::{
  classify::render_body,
  error::{Error, Result},
  html::Document,
  layout::{self, author_label, format_date},
};

// ─── Style rotation ──────────────────────────────────────────────────────────

/// Rotates the visual style of rendered messages: cold, gray, dark, cold...
///
/// One cycle is shared by every page of a run, so consecutive threads carry
/// on where the previous one stopped.
#[derive(Debug, Default)]
pub struct StyleCycle {
  rendered: usize,
}

impl StyleCycle {
  pub const CLASSES: [&'static str; 3] = ["aether-post-cold", "aether-post-gray", "aether-post-dark"];

  pub fn next_class(&mut self) -> &'static str {
    let class = Self::CLASSES[self.rendered % Self::CLASSES.len()];
    self.rendered += 1;
    class
  }
}

// ─── Fetched tree ────────────────────────────────────────────────────────────

/// A thread or post together with everything needed to render it.
#[derive(Debug)]
pub struct Node<T> {
  pub item:    T,
  /// Author display name, `None` when the key is unknown.
  pub author:  Option<String>,
  pub score:   i64,
  pub replies: Vec<Node<Post>>,
}

#[derive(Debug)]
pub struct ThreadView {
  pub root: Node<Thread>,
}

impl ThreadView {
  pub fn thread(&self) -> &Thread { &self.root.item }

  /// Number of posts below the thread, at any depth.
  pub fn post_count(&self) -> usize {
    fn count(nodes: &[Node<Post>]) -> usize {
      nodes.iter().map(|n| 1 + count(&n.replies)).sum()
    }
    count(&self.root.replies)
  }
}

/// Resolve an author's display name. Empty names count as unknown.
pub async fn author_name<S: ForumStore>(store: &S, fingerprint: &str) -> Result<Option<String>> {
  let key = store.get_public_key(fingerprint).await.map_err(Error::store)?;
  Ok(key.map(|k| k.name).filter(|n| !n.is_empty()))
}

async fn target_score<S: ForumStore>(store: &S, target: &str) -> Result<i64> {
  let votes = store.list_votes(target).await.map_err(Error::store)?;
  Ok(score(&votes))
}

/// Load `thread` and its full reply tree.
///
/// A post reached twice means the parent links form a cycle; that is
/// reported as [`Error::ReplyCycle`].
pub async fn fetch_thread<S: ForumStore>(store: &S, thread: Thread) -> Result<ThreadView> {
  let author = author_name(store, &thread.owner_fingerprint).await?;
  let score = target_score(store, &thread.fingerprint).await?;

  let mut visited = HashSet::new();
  let replies = fetch_replies(store, &thread.fingerprint, &thread.fingerprint, &mut visited).await?;

  Ok(ThreadView { root: Node { item: thread, author, score, replies } })
}

fn fetch_replies<'a, S: ForumStore>(
  store: &'a S,
  thread: &'a str,
  parent: &'a str,
  visited: &'a mut HashSet<String>,
) -> Pin<Box<dyn Future<Output = Result<Vec<Node<Post>>>> + Send + 'a>> {
  Box::pin(async move {
    let posts = store.list_replies(thread, parent).await.map_err(Error::store)?;
    let mut nodes = Vec::with_capacity(posts.len());

    for post in posts {
      if !visited.insert(post.fingerprint.clone()) {
        return Err(Error::ReplyCycle {
          thread: thread.to_string(),
          post:   post.fingerprint,
        });
      }
      let author = author_name(store, &post.owner_fingerprint).await?;
      let score = target_score(store, &post.fingerprint).await?;
      let replies = fetch_replies(store, thread, &post.fingerprint, visited).await?;
      nodes.push(Node { item: post, author, score, replies });
    }
    Ok(nodes)
  })
}

// ─── Links ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
  Image,
  Video,
  Plain,
}

/// Classify an external link by the extension of its path.
pub fn classify_link(link: &str) -> LinkKind {
  let path = link.split(['?', '#']).next().unwrap_or_default();
  let file = path.rsplit('/').next().unwrap_or_default();
  let Some((_, ext)) = file.rsplit_once('.') else {
    return LinkKind::Plain;
  };
  match ext.to_ascii_lowercase().as_str() {
    "png" | "jpg" | "jpeg" | "webp" | "gif" => LinkKind::Image,
    "mp4" | "webm" | "avi" => LinkKind::Video,
    _ => LinkKind::Plain,
  }
}

fn write_link(doc: &mut Document, link: &str, alt: &str) -> Result<()> {
  doc.elem("div", &[("class", "aether-thread-link")], |doc| match classify_link(link) {
    LinkKind::Image => doc.elem("a", &[("href", link)], |doc| {
      doc.void("img", &[("src", link), ("alt", alt), ("loading", "lazy")])
    }),
    LinkKind::Video => {
      doc.elem("video", &[("src", link), ("controls", "controls"), ("preload", "metadata")], |doc| {
        doc.text_elem("a", &[("href", link)], link)
      })
    }
    LinkKind::Plain => doc.text_elem("a", &[("href", link)], link),
  })
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn write_message<T: Displayable>(doc: &mut Document, node: &Node<T>, with_date: bool) -> Result<()> {
  let score = node.score.to_string();
  doc.elem("div", &[("class", "aether-post-meta")], |doc| {
    doc.text_elem("h3", &[], &author_label(node.author.as_deref()))?;
    if with_date {
      doc.text_elem("h4", &[], &format_date(node.item.local_arrival()))?;
    }
    doc.text_elem("span", &[("class", "aether-score"), ("title", "score")], &score)
  })?;
  doc.elem("div", &[("class", "aether-post-content")], |doc| {
    doc.raw(&render_body(node.item.body()))
  })
}

fn write_replies(doc: &mut Document, replies: &[Node<Post>], styles: &mut StyleCycle) -> Result<()> {
  for reply in replies {
    let class = format!("aether-post {}", styles.next_class());
    doc.elem("div", &[("class", class.as_str()), ("id", reply.item.fingerprint.as_str())], |doc| {
      write_message(doc, reply, true)?;
      write_replies(doc, &reply.replies, styles)
    })?;
  }
  Ok(())
}

/// Render the page for one thread. Written to `<board>/<thread>/index.html`.
pub fn render_thread_page(
  board: &Board,
  view: &ThreadView,
  styles: &mut StyleCycle,
  generated: DateTime<Utc>,
) -> Result<String> {
  let thread = view.thread();
  let title = format!("{} · {}", thread.name, board.name);

  let mut doc = Document::html()?;
  doc.elem("html", &[], |doc| {
    layout::head(doc, &title, "../../")?;
    doc.elem("body", &[], |doc| {
      doc.elem("nav", &[], |doc| {
        doc.text_elem("a", &[("href", "../../index.html")], "Communities")?;
        doc.text(" / ")?;
        doc.text_elem("a", &[("href", "../index.html")], &board.name)
      })?;

      doc.elem("header", &[("class", "aether-thread-header")], |doc| {
        doc.text_elem("h1", &[], &thread.name)?;
        if let Some(link) = &thread.link {
          write_link(doc, link, &thread.name)?;
        }
        doc.text_elem("h4", &[], &format_date(thread.local_arrival))
      })?;

      let class = format!("aether-thread-body {}", styles.next_class());
      doc.elem("div", &[("class", class.as_str()), ("id", thread.fingerprint.as_str())], |doc| {
        write_message(doc, &view.root, false)
      })?;

      doc.elem("div", &[("class", "aether-replies")], |doc| {
        write_replies(doc, &view.root.replies, styles)
      })?;

      layout::footer(doc, generated)
    })
  })?;

  Ok(doc.finish())
}
