//! [`Persister`]: the validate → decode → render → write pipeline.

use std::sync::Arc;

use bytes::Bytes;
use folio_core::{
  PdfRequest, ValidRecord, ValidationError,
  store::{DocumentStore, StoredFile},
};
use folio_pdf::GenerateMode;

use crate::error::ApiError;

/// Per-record result inside a batch.
#[derive(Debug)]
pub enum RecordOutcome {
  Stored(StoredFile),
  Failed { index: usize, error: ApiError },
}

/// Turns [`PdfRequest`]s into files in a [`DocumentStore`].
pub struct Persister<S> {
  store: Arc<S>,
  mode:  GenerateMode,
}

impl<S> Persister<S>
where
  S: DocumentStore,
{
  pub fn new(store: Arc<S>, mode: GenerateMode) -> Self { Self { store, mode } }

  /// Validate, decode, render and persist one record.
  ///
  /// Validation happens before any decoding or I/O; the first failing stage
  /// short-circuits the rest.
  pub async fn process(&self, request: PdfRequest) -> Result<StoredFile, ApiError> {
    let ValidRecord { payload, meta } = request.validate()?;

    let mode = self.mode;
    let pdf = tokio::task::spawn_blocking(move || folio_pdf::generate(mode, &payload))
      .await??;

    let path = self.store.path_for(&meta);
    let stored = self
      .store
      .persist(path, Bytes::from(pdf))
      .await
      .map_err(|e| ApiError::Store(Box::new(e)))?;

    tracing::info!(
      path = %stored.path.display(),
      bytes = stored.bytes,
      sha256 = %stored.sha256,
      ticket = %meta.ticket_ref,
      %mode,
      "stored document"
    );
    Ok(stored)
  }

  /// Process one batch element, tagging the result with its position.
  pub async fn process_record(&self, index: usize, request: PdfRequest) -> RecordOutcome {
    match self.process(request).await {
      Ok(stored) => RecordOutcome::Stored(stored),
      Err(error) => RecordOutcome::Failed { index, error },
    }
  }

  /// Process `requests` strictly in order, stopping at the first failure.
  ///
  /// Files written for records before the failing one are left in place.
  /// On success the results are in input order.
  pub async fn process_all(
    &self,
    requests: Vec<PdfRequest>,
  ) -> Result<Vec<StoredFile>, ApiError> {
    if requests.is_empty() {
      return Err(ValidationError::EmptyBatch.into());
    }

    let total = requests.len();
    let mut stored = Vec::with_capacity(total);
    for (index, request) in requests.into_iter().enumerate() {
      match self.process_record(index, request).await {
        RecordOutcome::Stored(file) => stored.push(file),
        RecordOutcome::Failed { index, error } => {
          tracing::warn!(index, total, written = stored.len(), "batch aborted");
          return Err(ApiError::Record {
            index,
            source: Box::new(error),
          });
        }
      }
    }
    Ok(stored)
  }
}
