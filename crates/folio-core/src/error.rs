//! Error types for `folio-core`.

use std::fmt;

use strum::{AsRefStr, Display, EnumIter};
use thiserror::Error;

/// One of the six required fields of a [`PdfRequest`](crate::PdfRequest).
///
/// Displays as the legacy wire name, which is what callers actually send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
pub enum Field {
  #[strum(serialize = "base64")]
  Payload,
  #[strum(serialize = "rut")]
  SubjectId,
  #[strum(serialize = "fecha")]
  Date,
  #[strum(serialize = "tipoDocumento")]
  DocumentType,
  #[strum(serialize = "producto")]
  Product,
  #[strum(serialize = "jira")]
  TicketRef,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
  #[error("all fields are required (missing: {})", FieldList(.0))]
  MissingFields(Vec<Field>),

  #[error("field {field} is not a safe path segment: {value:?}")]
  UnsafeSegment { field: Field, value: String },

  #[error("request body must be a JSON array")]
  NotAnArray,

  #[error("request array must not be empty")]
  EmptyBatch,

  #[error("record {index} is not a valid request object: {reason}")]
  InvalidRecord { index: usize, reason: String },
}

struct FieldList<'a>(&'a [Field]);

impl fmt::Display for FieldList<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, field) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str(", ")?;
      }
      f.write_str(field.as_ref())?;
    }
    Ok(())
  }
}

pub type Result<T, E = ValidationError> = std::result::Result<T, E>;
