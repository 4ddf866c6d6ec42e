//! The inbound record and its validation.
//!
//! The wire contract uses the legacy field names (`base64`, `rut`, `fecha`,
//! `tipoDocumento`, `producto`, `jira`); the descriptive names are accepted
//! as aliases. Every field is optional at the serde level so that a missing
//! field surfaces as a [`ValidationError`] rather than a JSON rejection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Field, Result, ValidationError};

// ─── Wire record ─────────────────────────────────────────────────────────────

/// A single payload + metadata record, as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PdfRequest {
  /// Base64-encoded PDF (or PNG, in image-embed mode).
  #[serde(rename = "base64", alias = "payload", default)]
  pub payload:       Option<String>,
  /// Subject identifier.
  #[serde(rename = "rut", alias = "subjectId", default)]
  #[schema(example = "12345678-9")]
  pub subject_id:    Option<String>,
  /// Document date. Not parsed; used verbatim in the file name.
  #[serde(rename = "fecha", alias = "date", default)]
  #[schema(example = "2024-05-01")]
  pub date:          Option<String>,
  #[serde(rename = "tipoDocumento", alias = "documentType", default)]
  #[schema(example = "contrato")]
  pub document_type: Option<String>,
  #[serde(rename = "producto", alias = "product", default)]
  #[schema(example = "seguro-vida")]
  pub product:       Option<String>,
  /// Ticket reference; the first directory level under `output/`.
  #[serde(rename = "jira", alias = "ticketRef", default)]
  #[schema(example = "OPS-1234")]
  pub ticket_ref:    Option<String>,
}

// ─── Validated record ────────────────────────────────────────────────────────

/// The metadata that determines where a document is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
  pub subject_id:    String,
  pub date:          String,
  pub document_type: String,
  pub product:       String,
  pub ticket_ref:    String,
}

/// A record that passed [`PdfRequest::validate`]. Only this type reaches the
/// decoder and the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRecord {
  pub payload: String,
  pub meta:    DocumentMeta,
}

impl PdfRequest {
  /// Check that all six fields are present and non-empty, and that every
  /// metadata field is usable as a single path segment.
  ///
  /// Missing fields are accumulated into one [`ValidationError::MissingFields`].
  pub fn validate(self) -> Result<ValidRecord> {
    let mut missing = Vec::new();
    let mut take = |field: Field, value: Option<String>| match value {
      Some(v) if !v.is_empty() => v,
      _ => {
        missing.push(field);
        String::new()
      }
    };

    let payload = take(Field::Payload, self.payload);
    let meta = DocumentMeta {
      subject_id:    take(Field::SubjectId, self.subject_id),
      date:          take(Field::Date, self.date),
      document_type: take(Field::DocumentType, self.document_type),
      product:       take(Field::Product, self.product),
      ticket_ref:    take(Field::TicketRef, self.ticket_ref),
    };

    if !missing.is_empty() {
      return Err(ValidationError::MissingFields(missing));
    }

    for (field, value) in meta.segments() {
      check_segment(field, value)?;
    }

    Ok(ValidRecord { payload, meta })
  }
}

impl DocumentMeta {
  /// Every metadata field paired with its [`Field`] tag.
  pub fn segments(&self) -> [(Field, &str); 5] {
    [
      (Field::SubjectId, self.subject_id.as_str()),
      (Field::Date, self.date.as_str()),
      (Field::DocumentType, self.document_type.as_str()),
      (Field::Product, self.product.as_str()),
      (Field::TicketRef, self.ticket_ref.as_str()),
    ]
  }
}

/// Reject values that would escape or restructure the output tree when used
/// as a path component.
pub fn check_segment(field: Field, value: &str) -> Result<()> {
  let unsafe_segment = value == "."
    || value == ".."
    || value.chars().any(|c| c == '/' || c == '\\' || c.is_control());

  if unsafe_segment {
    return Err(ValidationError::UnsafeSegment {
      field,
      value: value.to_owned(),
    });
  }
  Ok(())
}

// ─── Batch parsing ───────────────────────────────────────────────────────────

/// Split a JSON body into batch records.
///
/// The body must be a non-empty array whose elements are objects with
/// (optionally) string-typed fields. Field presence is *not* checked here;
/// that happens per record, in order, during processing.
pub fn parse_batch(body: serde_json::Value) -> Result<Vec<PdfRequest>> {
  let serde_json::Value::Array(items) = body else {
    return Err(ValidationError::NotAnArray);
  };
  if items.is_empty() {
    return Err(ValidationError::EmptyBatch);
  }

  items
    .into_iter()
    .enumerate()
    .map(|(index, item)| {
      serde_json::from_value(item).map_err(|e| ValidationError::InvalidRecord {
        index,
        reason: e.to_string(),
      })
    })
    .collect()
}
