//! Stylesheets shipped with every snapshot.

use std::path::Path;

use crate::writer::write_document;

pub const STYLE_CSS: &str = include_str!("../assets/style.css");
pub const AETHER_CSS: &str = include_str!("../assets/aether.css");

/// Copy the stylesheets into `root`, replacing any previous copies.
/// Returns how many failed to write.
pub async fn install(root: &Path) -> usize {
  let mut failed = 0;
  for (name, contents) in [("style.css", STYLE_CSS), ("aether.css", AETHER_CSS)] {
    if !write_document(contents, &root.join(name)).await {
      failed += 1;
    }
  }
  failed
}
