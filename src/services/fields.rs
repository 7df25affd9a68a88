//! Form-field creation under a page.
//!
//! Fields are created one request at a time against
//! `/api/paginas/{page_id}/campos/`. The batch variant keeps going after a
//! failed field and reports every field's fate.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{failure_message, ApiError, PAGE_ID_REQUIRED};
use crate::services::batch::{drive, BatchOptions};
use crate::services::http::{ApiRequest, RequestOptions, Transport};
use crate::services::outcome::{BatchFailure, BatchOutcome, BatchSuccess};
use crate::services::path::segment;
use crate::services::record::sanitize;

/// Field collection of a page. Blank page ids are rejected.
pub fn fields_path(page_id: &str) -> Result<String, ApiError> {
    Ok(format!("/api/paginas/{}/campos/", segment(page_id, PAGE_ID_REQUIRED)?))
}

/// Creates one field. Errors are returned as-is.
pub async fn post_field<R: Serialize + ?Sized>(
    transport: &dyn Transport,
    page_id: &str,
    field: &R,
    options: RequestOptions,
) -> Result<Option<Value>, ApiError> {
    let path = fields_path(page_id)?;
    let body = sanitize(field)?;

    let request = ApiRequest::post(path, body).options(options);
    let response = transport.execute(request).await?;
    Ok(response.body)
}

/// Creates every field in `fields`, collecting successes and failures.
///
/// Fails as a whole only when `page_id` is empty or the batch is cancelled.
pub async fn post_fields_batch<R: Serialize>(
    transport: &dyn Transport,
    page_id: &str,
    fields: &[R],
    options: &BatchOptions,
) -> Result<BatchOutcome, ApiError> {
    fields_path(page_id)?;

    let mut outcome = BatchOutcome::default();
    if fields.is_empty() {
        return Ok(outcome);
    }

    debug!(page_id, count = fields.len(), dispatch = ?options.dispatch, "submitting field batch");

    let results = drive(fields.iter(), options, |field, opts| {
        post_field(transport, page_id, field, opts)
    })
    .await?;

    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(data) => outcome.ok.push(BatchSuccess { index, data }),
            Err(e) => {
                let message = failure_message(&e);
                warn!(page_id, index, error = %message, "field submission failed");
                outcome.errors.push(BatchFailure { index, message });
            }
        }
    }

    info!(
        page_id,
        ok = outcome.ok.len(),
        failed = outcome.errors.len(),
        "field batch finished"
    );
    Ok(outcome)
}
