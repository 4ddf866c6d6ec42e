//! OpenAPI document for the Folio HTTP API.

use folio_core::PdfRequest;
use utoipa::OpenApi;

use crate::{
  error::ErrorBody,
  generate::{self, GenerateResponse},
  system::{self, HealthStatus},
};

#[derive(OpenApi)]
#[openapi(
  info(
    title = "folio",
    description = "Stores base64-encoded PDF payloads under a metadata-derived path"
  ),
  paths(generate::generate_one, generate::generate_many, system::health),
  components(schemas(PdfRequest, GenerateResponse, ErrorBody, HealthStatus)),
  tags(
    (name = "documents", description = "Document generation and storage"),
    (name = "system", description = "Probes")
  )
)]
pub struct ApiDoc;
