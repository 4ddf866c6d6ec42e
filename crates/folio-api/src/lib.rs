//! JSON HTTP API for Folio.
//!
//! Exposes an axum [`Router`] backed by a [`Persister`] over any
//! [`DocumentStore`]. TLS and transport concerns are the caller's
//! responsibility; there is no authentication.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let persister = Arc::new(Persister::new(Arc::new(store), GenerateMode::Passthrough));
//! let app = folio_api::api_router(persister, 10 * 1024 * 1024);
//! ```

pub mod error;
pub mod generate;
pub mod openapi;
pub mod persister;
pub mod system;

use std::sync::Arc;

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use folio_core::store::DocumentStore;
use utoipa::OpenApi as _;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;
pub use persister::{Persister, RecordOutcome};

/// Default request body ceiling: 10 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Build a fully-materialised API router for `persister`.
///
/// Bodies larger than `body_limit` bytes are rejected with 413 before any
/// processing. Swagger UI is served under `/api-docs/`, backed by the
/// document at `/api-docs/openapi.json`.
pub fn api_router<S>(persister: Arc<Persister<S>>, body_limit: usize) -> Router<()>
where
  S: DocumentStore + 'static,
{
  Router::new()
    .route("/generate-pdf", post(generate::generate_one::<S>))
    .route("/generate-pdfs", post(generate::generate_many::<S>))
    .route("/health", get(system::health))
    .merge(
      SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
    )
    .layer(DefaultBodyLimit::max(body_limit))
    .with_state(persister)
}

#[cfg(test)]
mod tests;
