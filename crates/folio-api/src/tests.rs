//! Router tests against a real `FsStore` in a temporary directory.

use std::{io::Cursor, path::Path, sync::Arc};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use folio_core::layout::Layout;
use folio_pdf::GenerateMode;
use folio_store_fs::FsStore;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt as _;

use super::*;

// ─── Fixtures ─────────────────────────────────────────────────────────────────

fn png_bytes() -> Vec<u8> {
  let mut buf = Vec::new();
  DynamicImage::ImageRgb8(RgbImage::from_pixel(30, 20, Rgb([0, 128, 0])))
    .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
    .unwrap();
  buf
}

fn pdf_b64() -> String { B64.encode(folio_pdf::embed_png(&png_bytes()).unwrap()) }

fn record(ticket: &str, subject: &str) -> Value {
  json!({
    "base64":        pdf_b64(),
    "rut":           subject,
    "fecha":         "2024-05-01",
    "tipoDocumento": "contrato",
    "producto":      "vida",
    "jira":          ticket,
  })
}

fn expected_path(base: &Path, ticket: &str, subject: &str) -> std::path::PathBuf {
  base
    .join("output")
    .join(ticket)
    .join(subject)
    .join(format!("{subject}__vida_contrato_2024-05-01.pdf"))
}

struct Harness {
  tmp:    TempDir,
  router: axum::Router,
}

fn harness_with(mode: GenerateMode, body_limit: usize) -> Harness {
  let tmp = TempDir::new().unwrap();
  let store = FsStore::new(tmp.path(), Layout::Nested);
  let persister = Arc::new(Persister::new(Arc::new(store), mode));
  Harness {
    router: api_router(persister, body_limit),
    tmp,
  }
}

fn harness() -> Harness { harness_with(GenerateMode::Passthrough, DEFAULT_BODY_LIMIT) }

async fn post(router: &axum::Router, uri: &str, body: String) -> Response {
  let req = Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body))
    .unwrap();
  router.clone().oneshot(req).await.unwrap()
}

async fn post_json(router: &axum::Router, uri: &str, body: &Value) -> Response {
  post(router, uri, body.to_string()).await
}

async fn json_body(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

fn pdf_count(base: &Path) -> usize {
  fn walk(dir: &Path, n: &mut usize) {
    let Ok(entries) = std::fs::read_dir(dir) else { return };
    for entry in entries.flatten() {
      let path = entry.path();
      if path.is_dir() {
        walk(&path, n);
      } else if path.extension().is_some_and(|e| e == "pdf") {
        *n += 1;
      }
    }
  }
  let mut n = 0;
  walk(base, &mut n);
  n
}

// ─── Single record ────────────────────────────────────────────────────────────

#[tokio::test]
async fn valid_record_is_written_at_derived_path() {
  let h = harness();
  let resp = post_json(&h.router, "/generate-pdf", &record("OPS-1", "111")).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body = json_body(resp).await;
  let expected = expected_path(h.tmp.path(), "OPS-1", "111");
  assert_eq!(body["message"], "PDF generated successfully");
  assert_eq!(body["filePath"], expected.display().to_string());

  let written = std::fs::read(&expected).unwrap();
  assert!(written.starts_with(b"%PDF-"));
  assert_eq!(pdf_count(h.tmp.path()), 1);
}

#[tokio::test]
async fn descriptive_field_names_are_accepted() {
  let h = harness();
  let body = json!({
    "payload":      pdf_b64(),
    "subjectId":    "222",
    "date":         "2024-05-01",
    "documentType": "contrato",
    "product":      "vida",
    "ticketRef":    "OPS-2",
  });
  let resp = post_json(&h.router, "/generate-pdf", &body).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(expected_path(h.tmp.path(), "OPS-2", "222").is_file());
}

#[tokio::test]
async fn each_missing_or_empty_field_yields_400_and_no_file() {
  let h = harness();
  for field in ["base64", "rut", "fecha", "tipoDocumento", "producto", "jira"] {
    for blank in [None, Some("")] {
      let mut body = record("OPS-1", "111");
      match blank {
        None => {
          body.as_object_mut().unwrap().remove(field);
        }
        Some(empty) => body[field] = json!(empty),
      }
      let resp = post_json(&h.router, "/generate-pdf", &body).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{field} {blank:?}");
      let err = json_body(resp).await;
      assert_eq!(err["message"], "All fields are required");
      assert!(err["details"].as_str().unwrap().contains(field), "{err}");
    }
  }
  assert_eq!(pdf_count(h.tmp.path()), 0);
}

#[tokio::test]
async fn same_record_twice_overwrites() {
  let h = harness_with(GenerateMode::ImageEmbed, DEFAULT_BODY_LIMIT);
  let mut body = record("OPS-1", "111");
  body["base64"] = json!(B64.encode(png_bytes()));

  let first = post_json(&h.router, "/generate-pdf", &body).await;
  assert_eq!(first.status(), StatusCode::OK);
  let path = expected_path(h.tmp.path(), "OPS-1", "111");
  let first_bytes = std::fs::read(&path).unwrap();

  let mut bigger = Vec::new();
  DynamicImage::ImageRgb8(RgbImage::from_fn(300, 300, |x, y| {
    Rgb([(x % 256) as u8, (y % 256) as u8, 7])
  }))
  .write_to(&mut Cursor::new(&mut bigger), ImageFormat::Png)
  .unwrap();
  body["base64"] = json!(B64.encode(&bigger));

  let second = post_json(&h.router, "/generate-pdf", &body).await;
  assert_eq!(second.status(), StatusCode::OK);
  assert_eq!(json_body(second).await["filePath"], path.display().to_string());

  let second_bytes = std::fs::read(&path).unwrap();
  assert_ne!(first_bytes, second_bytes);
  assert_eq!(pdf_count(h.tmp.path()), 1);
}

#[tokio::test]
async fn invalid_base64_yields_400_and_no_file() {
  let h = harness();
  let mut body = record("OPS-1", "111");
  body["base64"] = json!("***not base64***");
  let resp = post_json(&h.router, "/generate-pdf", &body).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(json_body(resp).await["message"], "Invalid document payload");
  assert_eq!(pdf_count(h.tmp.path()), 0);
}

#[tokio::test]
async fn non_pdf_payload_yields_400_and_no_file() {
  let h = harness();
  let mut body = record("OPS-1", "111");
  body["base64"] = json!(B64.encode(b"definitely not a PDF"));
  let resp = post_json(&h.router, "/generate-pdf", &body).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(pdf_count(h.tmp.path()), 0);
}

#[tokio::test]
async fn image_embed_mode_rejects_pdf_payloads() {
  let h = harness_with(GenerateMode::ImageEmbed, DEFAULT_BODY_LIMIT);
  let resp = post_json(&h.router, "/generate-pdf", &record("OPS-1", "111")).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(pdf_count(h.tmp.path()), 0);
}

#[tokio::test]
async fn traversal_metadata_is_rejected() {
  let h = harness();
  let resp = post_json(&h.router, "/generate-pdf", &record("../../etc", "111")).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(pdf_count(h.tmp.path()), 0);
  assert!(!h.tmp.path().join("output").exists());
}

#[tokio::test]
async fn new_ticket_and_subject_directories_are_created() {
  let h = harness();
  let dir = h.tmp.path().join("output").join("FRESH-7").join("999");
  assert!(!dir.exists());
  let resp = post_json(&h.router, "/generate-pdf", &record("FRESH-7", "999")).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert!(dir.is_dir());
}

#[tokio::test]
async fn filesystem_failure_yields_500() {
  let tmp = TempDir::new().unwrap();
  let blocker = tmp.path().join("not-a-dir");
  std::fs::write(&blocker, b"x").unwrap();
  let persister = Arc::new(Persister::new(
    Arc::new(FsStore::new(&blocker, Layout::Nested)),
    GenerateMode::Passthrough,
  ));
  let router = api_router(persister, DEFAULT_BODY_LIMIT);

  let resp = post_json(&router, "/generate-pdf", &record("OPS-1", "111")).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let err = json_body(resp).await;
  assert_eq!(err["message"], "Internal server error");
  assert!(err["details"].is_string());
}

#[tokio::test]
async fn malformed_json_yields_400() {
  let h = harness();
  let resp = post(&h.router, "/generate-pdf", "{not json".to_string()).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_body_yields_413_before_processing() {
  let h = harness_with(GenerateMode::Passthrough, 64);
  let resp = post_json(&h.router, "/generate-pdf", &record("OPS-1", "111")).await;
  assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
  assert_eq!(pdf_count(h.tmp.path()), 0);
}

// ─── Batch ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn batch_writes_every_record_in_order() {
  let h = harness();
  let batch = json!([
    record("OPS-1", "111"),
    record("OPS-1", "222"),
    record("OPS-9", "333"),
  ]);
  let resp = post_json(&h.router, "/generate-pdfs", &batch).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let body = json_body(resp).await;
  let results = body.as_array().unwrap();
  assert_eq!(results.len(), 3);
  for (result, (ticket, subject)) in
    results.iter().zip([("OPS-1", "111"), ("OPS-1", "222"), ("OPS-9", "333")])
  {
    let path = expected_path(h.tmp.path(), ticket, subject);
    assert_eq!(result["filePath"], path.display().to_string());
    assert_eq!(result["message"], "PDF generated successfully");
    assert!(path.is_file());
  }
  assert_eq!(pdf_count(h.tmp.path()), 3);
}

#[tokio::test]
async fn empty_or_non_array_batch_yields_400() {
  let h = harness();
  for body in [json!([]), record("OPS-1", "111"), json!("text"), json!(null)] {
    let resp = post_json(&h.router, "/generate-pdfs", &body).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
    let err = json_body(resp).await;
    assert!(err.get("message").is_some());
    assert!(!err.is_array());
  }
  assert_eq!(pdf_count(h.tmp.path()), 0);
}

#[tokio::test]
async fn batch_aborts_on_first_invalid_record_without_rollback() {
  let h = harness();
  let mut bad = record("OPS-1", "222");
  bad.as_object_mut().unwrap().remove("fecha");
  let batch = json!([record("OPS-1", "111"), bad, record("OPS-1", "333")]);

  let resp = post_json(&h.router, "/generate-pdfs", &batch).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let err = json_body(resp).await;
  assert!(!err.is_array());
  assert!(err["details"].as_str().unwrap().starts_with("record 1:"), "{err}");

  // The first record was already written; the third was never reached.
  assert!(expected_path(h.tmp.path(), "OPS-1", "111").is_file());
  assert!(!expected_path(h.tmp.path(), "OPS-1", "333").exists());
  assert_eq!(pdf_count(h.tmp.path()), 1);
}

#[tokio::test]
async fn batch_aborts_on_decode_failure() {
  let h = harness();
  let mut bad = record("OPS-1", "222");
  bad["base64"] = json!("!!!");
  let batch = json!([record("OPS-1", "111"), bad, record("OPS-1", "333")]);

  let resp = post_json(&h.router, "/generate-pdfs", &batch).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  assert_eq!(pdf_count(h.tmp.path()), 1);
}

#[tokio::test]
async fn batch_with_non_object_element_writes_nothing() {
  let h = harness();
  let batch = json!([record("OPS-1", "111"), 42]);

  let resp = post_json(&h.router, "/generate-pdfs", &batch).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let err = json_body(resp).await;
  assert!(err.get("message").is_some(), "{err}");
  assert!(!expected_path(h.tmp.path(), "OPS-1", "111").exists());
  assert_eq!(pdf_count(h.tmp.path()), 0);
}

// ─── Persister directly ───────────────────────────────────────────────────────

#[tokio::test]
async fn process_all_rejects_empty_input() {
  let tmp = TempDir::new().unwrap();
  let persister = Persister::new(
    Arc::new(FsStore::new(tmp.path(), Layout::Nested)),
    GenerateMode::Passthrough,
  );
  let err = persister.process_all(Vec::new()).await.unwrap_err();
  assert!(
    matches!(err, ApiError::Validation(folio_core::ValidationError::EmptyBatch)),
    "{err:?}"
  );
}

#[tokio::test]
async fn process_record_tags_failures_with_index() {
  let tmp = TempDir::new().unwrap();
  let persister = Persister::new(
    Arc::new(FsStore::new(tmp.path(), Layout::Flat)),
    GenerateMode::Passthrough,
  );
  let outcome = persister
    .process_record(4, folio_core::PdfRequest::default())
    .await;
  assert!(matches!(outcome, RecordOutcome::Failed { index: 4, .. }), "{outcome:?}");
}

// ─── Discovery ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn openapi_document_lists_both_routes() {
  let h = harness();
  let req = Request::builder()
    .uri("/api-docs/openapi.json")
    .body(Body::empty())
    .unwrap();
  let resp = h.router.clone().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  let doc = json_body(resp).await;
  assert!(doc["paths"].get("/generate-pdf").is_some(), "{doc}");
  assert!(doc["paths"].get("/generate-pdfs").is_some(), "{doc}");
  assert!(doc["components"]["schemas"].get("PdfRequest").is_some());
}

#[tokio::test]
async fn swagger_ui_is_served_under_api_docs() {
  let h = harness();
  let req = Request::builder().uri("/api-docs/").body(Body::empty()).unwrap();
  let resp = h.router.clone().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap();
  assert!(content_type.starts_with("text/html"), "{content_type}");
}

#[tokio::test]
async fn health_returns_ok() {
  let h = harness();
  let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
  let resp = h.router.clone().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(json_body(resp).await["status"], "ok");
}
