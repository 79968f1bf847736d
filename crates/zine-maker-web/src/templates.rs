//! Askama templates for the zine maker pages.
//!
//! There is a single page. Which affordances it shows is decided entirely
//! server-side from the booklet phase:
//!
//! - `AutoLoaded`: download link only, no upload form
//! - `AwaitingUpload`: upload form only
//! - `Merged`: upload form plus download link (re-merging stays available)

use askama::Template;
use askama_web::WebTemplate;

use crate::state::PhaseView;

/// Download affordance rendered on the landing page.
pub struct DownloadLink {
    pub href: String,
    pub filename: String,
    pub page_count: usize,
}

/// Landing page.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub auto_loaded: bool,
    pub download: Option<DownloadLink>,
    /// User-visible rejection message for a failed merge
    pub error: Option<String>,
}

impl IndexTemplate {
    pub fn from_view(view: PhaseView, error: Option<String>) -> Self {
        let download = view.download.map(|d| DownloadLink {
            href: format!("/download/{}", d.id),
            filename: d.filename,
            page_count: d.page_count,
        });

        Self {
            auto_loaded: view.auto_loaded,
            download,
            error,
        }
    }
}
