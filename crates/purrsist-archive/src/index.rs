//! Board and global index pages.

use chrono::{DateTime, Utc};
use purrsist_core::Board;

use crate::{
  error::Result,
  html::Document,
  layout::{self, format_date},
  thread::ThreadView,
};

/// A rendered thread as listed on its board index.
#[derive(Debug, Clone)]
pub struct ThreadSummary {
  pub fingerprint:   String,
  pub name:          String,
  pub local_arrival: DateTime<Utc>,
  pub score:         i64,
  pub posts:         usize,
}

impl From<&ThreadView> for ThreadSummary {
  fn from(view: &ThreadView) -> Self {
    let thread = view.thread();
    Self {
      fingerprint:   thread.fingerprint.clone(),
      name:          thread.name.clone(),
      local_arrival: thread.local_arrival,
      score:         view.root.score,
      posts:         view.post_count(),
    }
  }
}

/// A board as listed on the global index.
#[derive(Debug, Clone)]
pub struct BoardSummary {
  /// Directory name under the snapshot root.
  pub fingerprint: String,
  pub name:        String,
  pub description: String,
  pub threads:     usize,
}

/// `<board>/index.html`.
pub fn render_board_index(
  board: &Board,
  owner: Option<&str>,
  threads: &[ThreadSummary],
  generated: DateTime<Utc>,
) -> Result<String> {
  let heading = format!("Aether community archive for: {}", board.name);

  let mut doc = Document::html()?;
  doc.elem("html", &[], |doc| {
    layout::head(doc, &board.name, "../")?;
    doc.elem("body", &[], |doc| {
      doc.elem("nav", &[], |doc| doc.text_elem("a", &[("href", "../index.html")], "Communities"))?;
      doc.text_elem("h1", &[], &heading)?;
      if let Some(owner) = owner {
        doc.text_elem("h2", &[], &format!("Created by: @{owner}"))?;
      }
      if !board.description.trim().is_empty() {
        doc.text_elem("p", &[("class", "aether-board-description")], &board.description)?;
      }

      doc.elem("ul", &[("class", "aether-thread-list")], |doc| {
        for thread in threads {
          let href = format!("{}/index.html", thread.fingerprint);
          let meta = format!(
            "{} · {} replies · score {}",
            format_date(thread.local_arrival),
            thread.posts,
            thread.score
          );
          doc.elem("li", &[], |doc| {
            doc.text_elem("a", &[("href", href.as_str())], &thread.name)?;
            doc.text_elem("span", &[("class", "aether-score")], &meta)
          })?;
        }
        Ok(())
      })?;

      layout::footer(doc, generated)
    })
  })?;

  Ok(doc.finish())
}

/// `index.html` at the snapshot root.
pub fn render_global_index(boards: &[BoardSummary], generated: DateTime<Utc>) -> Result<String> {
  let mut doc = Document::html()?;
  doc.elem("html", &[], |doc| {
    layout::head(doc, "Aether archive", "")?;
    doc.elem("body", &[], |doc| {
      doc.text_elem("h1", &[], "Aether archive: communities list")?;

      if boards.is_empty() {
        doc.text_elem("p", &[("class", "aether-empty")], "No communities archived yet.")?;
      } else {
        doc.elem("ul", &[("class", "aether-board-list")], |doc| {
          for board in boards {
            let href = format!("{}/index.html", board.fingerprint);
            let count = match board.threads {
              1 => "1 thread".to_string(),
              n => format!("{n} threads"),
            };
            doc.elem("li", &[], |doc| {
              doc.text_elem("a", &[("href", href.as_str())], &board.name)?;
              doc.text_elem("span", &[("class", "aether-count")], &count)?;
              if !board.description.trim().is_empty() {
                doc.text_elem("p", &[("class", "aether-board-description")], &board.description)?;
              }
              Ok(())
            })?;
          }
          Ok(())
        })?;
      }

      layout::footer(doc, generated)
    })
  })?;

  Ok(doc.finish())
}
