//! Batch manifests: a TOML list of files plus their metadata.
//!
//! ```toml
//! [[document]]
//! file          = "contracts/alice.pdf"
//! subject_id    = "12345678-9"
//! date          = "2024-05-01"
//! document_type = "contrato"
//! product       = "vida"
//! ticket_ref    = "OPS-1234"
//! ```
//!
//! Relative `file` paths are resolved against the manifest's directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use folio_core::PdfRequest;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Manifest {
  #[serde(default, rename = "document")]
  pub documents: Vec<Entry>,
}

/// Metadata for one file; also the shape of `submit`'s flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
  pub file:          PathBuf,
  pub subject_id:    String,
  pub date:          String,
  pub document_type: String,
  pub product:       String,
  pub ticket_ref:    String,
}

impl Manifest {
  pub fn load(path: &Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading manifest {}", path.display()))?;
    let mut manifest: Manifest = toml::from_str(&raw).context("parsing manifest")?;
    if manifest.documents.is_empty() {
      bail!("manifest {} lists no documents", path.display());
    }

    let root = path.parent().unwrap_or(Path::new("."));
    for entry in &mut manifest.documents {
      if entry.file.is_relative() {
        entry.file = root.join(&entry.file);
      }
    }
    Ok(manifest)
  }
}

impl Entry {
  /// Read and base64-encode the file and build the wire record.
  pub fn to_request(&self) -> Result<PdfRequest> {
    let bytes = std::fs::read(&self.file)
      .with_context(|| format!("reading {}", self.file.display()))?;
    Ok(PdfRequest {
      payload:       Some(B64.encode(bytes)),
      subject_id:    Some(self.subject_id.clone()),
      date:          Some(self.date.clone()),
      document_type: Some(self.document_type.clone()),
      product:       Some(self.product.clone()),
      ticket_ref:    Some(self.ticket_ref.clone()),
    })
  }
}
