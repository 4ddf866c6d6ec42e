//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error leaving a handler is logged here, at the response boundary:
//! `warn` for caller mistakes, `error` for server-side failures.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use folio_core::ValidationError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Codec(#[from] folio_pdf::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("{message}")]
  Rejected { status: StatusCode, message: String },

  #[error("background task failed: {0}")]
  Join(#[from] tokio::task::JoinError),

  /// A batch aborted at record `index` (zero-based).
  #[error("record {index}: {source}")]
  Record {
    index:  usize,
    #[source]
    source: Box<ApiError>,
  },
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    let status = match rejection.status() {
      s @ (StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNSUPPORTED_MEDIA_TYPE) => s,
      _ => StatusCode::BAD_REQUEST,
    };
    ApiError::Rejected {
      status,
      message: rejection.body_text(),
    }
  }
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Codec(e) if e.is_caller_fault() => StatusCode::BAD_REQUEST,
      ApiError::Codec(_) | ApiError::Store(_) | ApiError::Join(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
      ApiError::Rejected { status, .. } => *status,
      ApiError::Record { source, .. } => source.status(),
    }
  }

  /// Short, stable message for the `message` field. The full error chain
  /// goes in `details`.
  fn summary(&self) -> &'static str {
    match self {
      ApiError::Validation(ValidationError::MissingFields(_)) => {
        "All fields are required"
      }
      ApiError::Validation(_) | ApiError::Rejected { .. } => "Invalid request",
      ApiError::Codec(e) if e.is_caller_fault() => "Invalid document payload",
      ApiError::Codec(_) | ApiError::Store(_) | ApiError::Join(_) => {
        "Internal server error"
      }
      ApiError::Record { source, .. } => source.summary(),
    }
  }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<String>,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(%status, error = %self, "request failed");
    } else {
      tracing::warn!(%status, error = %self, "request rejected");
    }

    let body = ErrorBody {
      message: self.summary().to_owned(),
      details: Some(self.to_string()),
    };
    (status, Json(body)).into_response()
  }
}
