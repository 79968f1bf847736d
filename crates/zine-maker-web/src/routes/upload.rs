//! Upload route - merging user-selected page PDFs.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Multipart;
use std::sync::Arc;
use tracing::{error, info};
use zine_maker_core::{merge_documents, Error};

use crate::helpers::{ResultExt, RouteResult};
use crate::state::AppState;
use crate::templates::IndexTemplate;

/// Merge the uploaded page PDFs into a new downloadable booklet.
///
/// Selected files arrive in browser-reported order; that order is the page
/// order of the output. Answers POST-Redirect-GET: `HX-Redirect` for HTMX
/// clients, `303 See Other` for plain form submissions.
///
/// A source that fails to parse re-renders the landing page with a
/// user-visible message and leaves any previous artifact in place.
pub async fn upload_pages(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> RouteResult<Response> {
    let mut sources: Vec<Vec<u8>> = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        if name == "files" {
            let data = field.bytes().await.or_bad_request()?;
            sources.push(data.to_vec());
        }
    }

    let source_count = sources.len();

    // Merge in a blocking task to avoid stalling the async runtime on parse
    // and serialization.
    let merged = tokio::task::spawn_blocking(move || merge_documents(&sources))
        .await
        .map_err(|e| {
            error!("Merge task panicked: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Merge failed".to_string(),
            )
        })?;

    let merged = match merged {
        Ok(merged) => merged,
        Err(e @ Error::MalformedInput { .. }) => {
            info!("Rejected upload: {}", e);
            let template = IndexTemplate::from_view(state.phase_view().await, Some(e.to_string()));
            return Ok((StatusCode::BAD_REQUEST, template).into_response());
        }
        Err(e) => {
            error!("Failed to assemble booklet: {}", e);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let page_count = merged.page_count;
    let Some(artifact_id) = state.publish_merged(merged).await else {
        return Err((
            StatusCode::CONFLICT,
            "A preconfigured booklet is already loaded; uploads are disabled".to_string(),
        ));
    };

    info!(
        "Published booklet {} from {} sources ({} pages)",
        artifact_id, source_count, page_count
    );

    // POST-Redirect-GET pattern
    let is_htmx = headers.get("HX-Request").is_some();

    if is_htmx {
        // HX-Redirect tells HTMX to do a full page navigation
        Response::builder()
            .status(StatusCode::OK)
            .header("HX-Redirect", "/")
            .body(Body::empty())
            .or_internal_error()
    } else {
        // Standard HTTP redirect for non-JS clients (303 See Other for POST-Redirect-GET)
        Response::builder()
            .status(StatusCode::SEE_OTHER)
            .header(header::LOCATION, "/")
            .body(Body::empty())
            .or_internal_error()
    }
}
