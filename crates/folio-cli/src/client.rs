//! Async HTTP client wrapping the folio JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use folio_core::PdfRequest;
use reqwest::{Client, Response};
use serde::Deserialize;

/// One stored document as reported by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stored {
  pub message:   String,
  pub file_path: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
  message: String,
  details: Option<String>,
}

/// Async HTTP client for the folio API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(120))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      client,
      base_url: base_url.into(),
    })
  }

  pub fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url.trim_end_matches('/'), path)
  }

  /// `POST /generate-pdf`
  pub async fn generate_one(&self, request: &PdfRequest) -> Result<Stored> {
    let resp = self
      .client
      .post(self.url("/generate-pdf"))
      .json(request)
      .send()
      .await
      .context("POST /generate-pdf failed")?;
    let resp = check(resp, "POST /generate-pdf").await?;
    resp.json().await.context("deserialising response")
  }

  /// `POST /generate-pdfs`
  pub async fn generate_many(&self, requests: &[PdfRequest]) -> Result<Vec<Stored>> {
    let resp = self
      .client
      .post(self.url("/generate-pdfs"))
      .json(requests)
      .send()
      .await
      .context("POST /generate-pdfs failed")?;
    let resp = check(resp, "POST /generate-pdfs").await?;
    resp.json().await.context("deserialising batch response")
  }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let text = resp.text().await.unwrap_or_default();
  match serde_json::from_str::<ErrorBody>(&text) {
    Ok(ErrorBody {
      message,
      details: Some(details),
    }) => Err(anyhow!("{what} → {status}: {message} ({details})")),
    Ok(ErrorBody { message, .. }) => Err(anyhow!("{what} → {status}: {message}")),
    Err(_) => Err(anyhow!("{what} → {status}: {text}")),
  }
}
