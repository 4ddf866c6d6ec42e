//! The `DocumentStore` trait and the [`StoredFile`] it returns.
//!
//! Implemented by storage backends (e.g. `folio-store-fs`). The HTTP layer
//! depends on this abstraction, not on any concrete backend.

use std::{future::Future, path::PathBuf};

use bytes::Bytes;

use crate::request::DocumentMeta;

/// The outcome of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
  /// Where the document now lives.
  pub path:   PathBuf,
  /// Number of bytes written.
  pub bytes:  u64,
  /// Lowercase hex SHA-256 of the written bytes.
  pub sha256: String,
}

/// Abstraction over a document storage backend.
///
/// There is no locking: two writes that resolve to the same path race, and
/// the last one wins.
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Compute the destination for a document with `meta`. Must be pure and
  /// deterministic.
  fn path_for(&self, meta: &DocumentMeta) -> PathBuf;

  /// Create any missing parent directories of `path` and write `bytes` to
  /// it, replacing an existing file.
  ///
  /// Once started, the write runs to completion even if the returned future
  /// is dropped.
  fn persist(
    &self,
    path: PathBuf,
    bytes: Bytes,
  ) -> impl Future<Output = Result<StoredFile, Self::Error>> + Send + '_;
}
