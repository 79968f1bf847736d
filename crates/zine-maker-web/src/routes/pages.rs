//! Page routes - full HTML page renders.

use axum::extract::State;
use std::sync::Arc;

use crate::state::AppState;
use crate::templates::IndexTemplate;

/// Landing page.
///
/// Renders the download affordance and, unless a preconfigured booklet was
/// auto-loaded, the upload form.
pub async fn index(State(state): State<Arc<AppState>>) -> IndexTemplate {
    IndexTemplate::from_view(state.phase_view().await, None)
}
