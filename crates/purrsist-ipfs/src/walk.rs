//! Local directory traversal for multipart uploads.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// One file or directory below (and including) an upload root.
#[derive(Debug, PartialEq, Eq)]
pub struct TreeEntry {
  /// `/`-separated path starting with the root directory's own name.
  pub name:   String,
  pub path:   PathBuf,
  pub is_dir: bool,
}

/// List `root` and everything below it, parents before children, siblings
/// sorted by name. The daemon requires a directory part to precede the parts
/// nested in it.
pub async fn collect_tree(root: &Path) -> Result<Vec<TreeEntry>> {
  let root_name = root
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .ok_or_else(|| Error::UnsafePath(root.display().to_string()))?;

  let mut entries = vec![TreeEntry {
    name:   root_name.clone(),
    path:   root.to_path_buf(),
    is_dir: true,
  }];
  let mut pending = vec![(root_name, root.to_path_buf())];

  while let Some((name, dir)) = pending.pop() {
    let mut children = Vec::new();
    let mut read_dir = tokio::fs::read_dir(&dir).await?;
    while let Some(child) = read_dir.next_entry().await? {
      let file_type = child.file_type().await?;
      if file_type.is_symlink() {
        continue;
      }
      children.push((
        child.file_name().to_string_lossy().into_owned(),
        child.path(),
        file_type.is_dir(),
      ));
    }
    children.sort_by(|a, b| a.0.cmp(&b.0));

    // Subdirectories are expanded later; pushing in reverse keeps the
    // overall order stable, though only parent-before-child is required.
    let mut subdirs = Vec::new();
    for (child_name, path, is_dir) in children {
      let full = format!("{name}/{child_name}");
      if is_dir {
        subdirs.push((full.clone(), path.clone()));
      }
      entries.push(TreeEntry { name: full, path, is_dir });
    }
    pending.extend(subdirs.into_iter().rev());
  }

  Ok(entries)
}

/// Reject link names that would escape the directory being materialised.
pub fn safe_component(name: &str) -> Result<&str> {
  if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
    return Err(Error::UnsafePath(name.to_string()));
  }
  Ok(name)
}
