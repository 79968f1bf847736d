//! Download route - serving the current booklet artifact.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::helpers::{OptionExt, ResultExt, RouteResult};
use crate::state::AppState;

/// Download the current booklet.
///
/// The id must match the current artifact; a replaced or unknown id no
/// longer resolves and answers 404.
pub async fn download_booklet(
    State(state): State<Arc<AppState>>,
    Path(artifact_id): Path<String>,
) -> RouteResult<Response> {
    let artifact = state
        .resolve_artifact(&artifact_id)
        .await
        .or_not_found("No booklet available under this link")?;

    debug!(
        "Serving booklet {} ({} pages, published {:.1}s ago)",
        artifact.id,
        artifact.page_count,
        artifact.created_at.elapsed().as_secs_f64()
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", artifact.filename),
        )
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(artifact.bytes.as_ref().clone()))
        .or_internal_error()
}
