use super::error::ApiError;
use super::types::{SortRequest, SortResponse};
use super::AppState;
use crate::executor::{run_timed, ExecutionMode, Executor};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Decode a request body. The `Content-Type` header is not consulted.
pub fn decode_request(body: &[u8]) -> Result<SortRequest, ApiError> {
    serde_json::from_slice(body).map_err(ApiError::InvalidPayload)
}

/// Decode `body`, sort it with `executor` under the stopwatch, and build the
/// response. Decoding failures return before the executor runs.
pub async fn process_body(executor: &dyn Executor, body: &[u8]) -> Result<SortResponse, ApiError> {
    let request = decode_request(body)?;
    let batch = Arc::new(request.to_sort);
    let timed = run_timed(executor, batch).await?;
    Ok(SortResponse::from(timed))
}

async fn process(
    state: &AppState,
    mode: ExecutionMode,
    body: &[u8],
) -> Result<Json<SortResponse>, ApiError> {
    let executor = state.executor(mode);
    match process_body(executor.as_ref(), body).await {
        Ok(response) => {
            info!(
                "Sorted {} sequences ({} mode) in {} ns",
                response.sorted_arrays.len(),
                mode,
                response.time_ns
            );
            Ok(Json(response))
        }
        Err(e) => {
            match &e {
                ApiError::InvalidPayload(source) => {
                    warn!("Rejected {} request: {}", mode, source)
                }
                other => warn!("{} request failed: {}", mode, other),
            }
            Err(e)
        }
    }
}

// Route handlers

pub(super) async fn process_single(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SortResponse>, ApiError> {
    process(&state, ExecutionMode::Sequential, &body).await
}

pub(super) async fn process_concurrent(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SortResponse>, ApiError> {
    process(&state, ExecutionMode::Concurrent, &body).await
}

pub(super) async fn process_pooled(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SortResponse>, ApiError> {
    process(&state, ExecutionMode::Pooled, &body).await
}

pub(super) async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    warn!("Rejected {} {}", method, uri.path());
    ApiError::MethodNotAllowed
}

pub(super) async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
