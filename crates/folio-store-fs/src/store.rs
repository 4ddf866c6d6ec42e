//! [`FsStore`], the filesystem implementation of [`DocumentStore`].

use std::{
  future::Future,
  path::{Path, PathBuf},
};

use bytes::Bytes;
use folio_core::{
  layout::{Layout, compute_path},
  request::DocumentMeta,
  store::{DocumentStore, StoredFile},
};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Writes documents below `base_dir` using a fixed [`Layout`].
///
/// Cloning is cheap; the store holds only configuration.
#[derive(Debug, Clone)]
pub struct FsStore {
  base_dir: PathBuf,
  layout:   Layout,
}

impl FsStore {
  /// Use `base_dir` as-is. Paths are only absolute if `base_dir` is.
  pub fn new(base_dir: impl Into<PathBuf>, layout: Layout) -> Self {
    Self {
      base_dir: base_dir.into(),
      layout,
    }
  }

  /// Create `base_dir` if needed and resolve it to an absolute path.
  pub async fn open(base_dir: impl AsRef<Path>, layout: Layout) -> Result<Self> {
    let base_dir = base_dir.as_ref().to_path_buf();
    tokio::fs::create_dir_all(&base_dir)
      .await
      .map_err(|source| Error::Io {
        path: base_dir.clone(),
        source,
      })?;
    let base_dir = tokio::fs::canonicalize(&base_dir)
      .await
      .map_err(|source| Error::Io {
        path: base_dir.clone(),
        source,
      })?;
    Ok(Self { base_dir, layout })
  }

  pub fn base_dir(&self) -> &Path { &self.base_dir }

  pub fn layout(&self) -> Layout { self.layout }
}

impl DocumentStore for FsStore {
  type Error = Error;

  fn path_for(&self, meta: &DocumentMeta) -> PathBuf {
    compute_path(&self.base_dir, self.layout, meta)
  }

  fn persist(
    &self,
    path: PathBuf,
    bytes: Bytes,
  ) -> impl Future<Output = Result<StoredFile>> + Send + '_ {
    // Spawned eagerly: dropping the returned future detaches the task
    // instead of aborting it.
    let task = tokio::task::spawn_blocking(move || write_file(&path, &bytes));
    async move { task.await? }
  }
}

// ─── Blocking helpers ────────────────────────────────────────────────────────

/// Recursively create the parent chain of `path`, then write (truncating any
/// existing file). Not atomic: a crash mid-write can leave a short file.
fn write_file(path: &Path, bytes: &[u8]) -> Result<StoredFile> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).map_err(|source| Error::Io {
      path: parent.to_path_buf(),
      source,
    })?;
  }
  std::fs::write(path, bytes).map_err(|source| Error::Io {
    path: path.to_path_buf(),
    source,
  })?;

  let stored = StoredFile {
    path:   path.to_path_buf(),
    bytes:  bytes.len() as u64,
    sha256: hex::encode(Sha256::digest(bytes)),
  };
  tracing::debug!(path = %stored.path.display(), bytes = stored.bytes, "wrote document");
  Ok(stored)
}
