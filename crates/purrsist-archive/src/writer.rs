//! Writing rendered documents to the workspace.

use std::path::Path;

/// Write `contents` to `path`, creating parent directories.
///
/// Failures are logged and reported as `false`; a page that could not be
/// written never aborts a run.
pub async fn write_document(contents: &str, path: &Path) -> bool {
  if let Some(parent) = path.parent()
    && let Err(e) = tokio::fs::create_dir_all(parent).await
  {
    tracing::error!(path = %path.display(), error = %e, "failed to create directory");
    return false;
  }
  match tokio::fs::write(path, contents).await {
    Ok(()) => {
      tracing::trace!(path = %path.display(), bytes = contents.len(), "wrote document");
      true
    }
    Err(e) => {
      tracing::error!(path = %path.display(), error = %e, "failed to write document");
      false
    }
  }
}
