//! Error types for the folio-pdf codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("payload is not valid base64: {0}")]
  Decode(#[from] base64::DecodeError),

  #[error("malformed document: {0}")]
  MalformedDocument(String),

  #[error("failed to serialize PDF: {0}")]
  Serialize(String),
}

impl Error {
  /// `true` when the caller sent bad bytes, as opposed to an encoder failure.
  pub fn is_caller_fault(&self) -> bool {
    matches!(self, Error::Decode(_) | Error::MalformedDocument(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
