//! Handlers for the document endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/generate-pdf`  | Body: one [`PdfRequest`]; returns [`GenerateResponse`] |
//! | `POST` | `/generate-pdfs` | Body: non-empty array of [`PdfRequest`]; aborts on first failure |

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use folio_core::{PdfRequest, request::parse_batch, store::{DocumentStore, StoredFile}};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
  error::{ApiError, ErrorBody},
  persister::Persister,
};

pub const SUCCESS_MESSAGE: &str = "PDF generated successfully";

/// Success body for one stored document.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
  pub message:   String,
  /// Absolute path of the written file.
  pub file_path: String,
}

impl From<StoredFile> for GenerateResponse {
  fn from(stored: StoredFile) -> Self {
    GenerateResponse {
      message:   SUCCESS_MESSAGE.to_owned(),
      file_path: stored.path.display().to_string(),
    }
  }
}

// ─── Single ───────────────────────────────────────────────────────────────────

#[utoipa::path(
  post,
  path = "/generate-pdf",
  tag = "documents",
  request_body = PdfRequest,
  responses(
    (status = 200, description = "Document stored", body = GenerateResponse),
    (status = 400, description = "Missing fields, unsafe metadata or undecodable payload", body = ErrorBody),
    (status = 413, description = "Body exceeds the configured limit"),
    (status = 500, description = "Filesystem failure", body = ErrorBody)
  )
)]
/// `POST /generate-pdf`
pub async fn generate_one<S>(
  State(persister): State<Arc<Persister<S>>>,
  body: Result<Json<PdfRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError>
where
  S: DocumentStore + 'static,
{
  let Json(request) = body?;
  let stored = persister.process(request).await?;
  Ok(Json(stored.into()))
}

// ─── Batch ────────────────────────────────────────────────────────────────────

#[utoipa::path(
  post,
  path = "/generate-pdfs",
  tag = "documents",
  request_body = Vec<PdfRequest>,
  responses(
    (status = 200, description = "Every document stored, in input order", body = Vec<GenerateResponse>),
    (status = 400, description = "Empty or non-array body, or a record failed validation", body = ErrorBody),
    (status = 413, description = "Body exceeds the configured limit"),
    (status = 500, description = "Filesystem failure", body = ErrorBody)
  )
)]
/// `POST /generate-pdfs`
pub async fn generate_many<S>(
  State(persister): State<Arc<Persister<S>>>,
  body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<Vec<GenerateResponse>>, ApiError>
where
  S: DocumentStore + 'static,
{
  let Json(value) = body?;
  let requests = parse_batch(value)?;
  let stored = persister.process_all(requests).await?;
  Ok(Json(stored.into_iter().map(GenerateResponse::from).collect()))
}
