//! Payload codec for Folio.
//!
//! Turns a base64 payload into the bytes of a PDF document. Pure and
//! synchronous; no HTTP or filesystem dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use folio_pdf::{GenerateMode, generate};
//!
//! let pdf = generate(GenerateMode::Passthrough, "JVBERi0xLjcK...").unwrap();
//! println!("{} bytes", pdf.len());
//! ```

mod decode;
mod embed;
mod passthrough;

pub mod error;

pub use decode::decode_payload;
pub use embed::{PAGE_HEIGHT, PAGE_WIDTH, embed_png};
pub use error::{Error, Result};
pub use passthrough::normalize;

use serde::Deserialize;
use strum::{Display, EnumString};

// ─── Mode ─────────────────────────────────────────────────────────────────────

/// How decoded payload bytes become a PDF.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GenerateMode {
  /// The payload is already a PDF; parse it and re-serialize it.
  #[default]
  Passthrough,
  /// The payload is a PNG; place it on a fresh A4 page at half scale.
  ImageEmbed,
}

// ─── Public API ───────────────────────────────────────────────────────────────

/// Produce PDF bytes from already-decoded payload bytes.
pub fn render(mode: GenerateMode, bytes: &[u8]) -> Result<Vec<u8>> {
  match mode {
    GenerateMode::Passthrough => normalize(bytes),
    GenerateMode::ImageEmbed => embed_png(bytes),
  }
}

/// Decode `payload_b64` and [`render`] it.
pub fn generate(mode: GenerateMode, payload_b64: &str) -> Result<Vec<u8>> {
  let bytes = decode_payload(payload_b64)?;
  tracing::debug!(%mode, decoded = bytes.len(), "rendering payload");
  render(mode, &bytes)
}
