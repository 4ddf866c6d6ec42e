//! Passthrough mode: the payload is a complete PDF.

use lopdf::Document;

use crate::{Error, Result};

/// Parse `bytes` as a PDF and write it back out.
///
/// The round trip through lopdf rebuilds the cross-reference table, so a
/// document that loads but carries a damaged xref comes out consistent.
/// A document without a catalog or without pages is rejected.
pub fn normalize(bytes: &[u8]) -> Result<Vec<u8>> {
  let mut doc = Document::load_mem(bytes)
    .map_err(|e| Error::MalformedDocument(format!("not a PDF document: {e}")))?;

  doc
    .catalog()
    .map_err(|e| Error::MalformedDocument(format!("missing or invalid catalog: {e}")))?;

  if doc.get_pages().is_empty() {
    return Err(Error::MalformedDocument("document has no pages".into()));
  }

  let mut out = Vec::with_capacity(bytes.len());
  doc
    .save_to(&mut out)
    .map_err(|e| Error::Serialize(e.to_string()))?;
  Ok(out)
}
