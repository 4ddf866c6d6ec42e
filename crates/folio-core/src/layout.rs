//! Deterministic on-disk layout for stored documents.
//!
//! ```text
//! <base_dir>/output/<ticket_ref>/<subject_id>/<subject_id>__<product>_<document_type>_<date>.pdf   (nested)
//! <base_dir>/output/<ticket_ref>/<subject_id>__<product>_<document_type>_<date>.pdf                (flat)
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use strum::{Display, EnumString};

use crate::request::DocumentMeta;

/// Name of the directory created directly under the base directory.
pub const OUTPUT_DIR: &str = "output";

/// Directory nesting below `output/<ticket_ref>/`.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Layout {
  /// One extra directory level per subject.
  #[default]
  Nested,
  /// Files for every subject share the ticket directory.
  Flat,
}

/// `<subject_id>__<product>_<document_type>_<date>.pdf`
pub fn file_name(meta: &DocumentMeta) -> String {
  format!(
    "{}__{}_{}_{}.pdf",
    meta.subject_id, meta.product, meta.document_type, meta.date
  )
}

/// Compute the destination path for `meta` under `base_dir`. Pure; touches
/// no filesystem state.
pub fn compute_path(
  base_dir: &Path,
  layout: Layout,
  meta: &DocumentMeta,
) -> PathBuf {
  let mut path = base_dir.join(OUTPUT_DIR).join(&meta.ticket_ref);
  if layout == Layout::Nested {
    path.push(&meta.subject_id);
  }
  path.push(file_name(meta));
  path
}
