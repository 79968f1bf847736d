use std::sync::Arc;
use std::time::Instant;

use tokio::sync::RwLock;
use uuid::Uuid;

use zine_maker_core::{AppConfig, MergedDocument};

/// A published booklet the user can download.
///
/// Exactly one artifact is current at a time. Publishing a new one replaces
/// the handle, and the replaced id stops resolving - download links are
/// invalidated rather than leaked.
pub struct Artifact {
    pub id: Uuid,
    pub bytes: Arc<Vec<u8>>,
    pub page_count: usize,
    pub filename: String,
    pub created_at: Instant,
}

impl Artifact {
    fn new(merged: MergedDocument, filename: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            bytes: Arc::new(merged.bytes),
            page_count: merged.page_count,
            filename,
            created_at: Instant::now(),
        }
    }
}

impl Clone for Artifact {
    /// Clone the artifact efficiently.
    ///
    /// This is O(1) for the payload - it only clones the `Arc` pointer to
    /// the underlying bytes, not the bytes themselves.
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            bytes: Arc::clone(&self.bytes),
            page_count: self.page_count,
            filename: self.filename.clone(),
            created_at: self.created_at,
        }
    }
}

/// Where the app is in its lifecycle.
pub enum BookletPhase {
    /// No preconfigured booklet was found; waiting for the user's pages.
    AwaitingUpload,
    /// The preconfigured booklet was found on startup. Terminal: the upload
    /// form is not offered in this phase.
    AutoLoaded(Artifact),
    /// At least one manual merge happened; re-merging stays available and
    /// each merge replaces the artifact.
    Merged(Artifact),
}

/// What the index page needs to render, snapshotted outside the lock.
pub struct PhaseView {
    pub auto_loaded: bool,
    pub download: Option<DownloadView>,
}

/// Download affordance data for templates.
pub struct DownloadView {
    pub id: Uuid,
    pub filename: String,
    pub page_count: usize,
}

/// Global application state
pub struct AppState {
    phase: RwLock<BookletPhase>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            phase: RwLock::new(BookletPhase::AwaitingUpload),
            config,
        }
    }

    /// Record a successful startup auto-load.
    ///
    /// Returns the artifact id of the published booklet.
    pub async fn publish_auto_loaded(&self, merged: MergedDocument) -> Uuid {
        let artifact = Artifact::new(merged, self.config.output.auto_filename.clone());
        let id = artifact.id;
        *self.phase.write().await = BookletPhase::AutoLoaded(artifact);
        id
    }

    /// Publish a manual merge, replacing (and thereby invalidating) any
    /// previous artifact.
    ///
    /// Returns `None` in the auto-loaded phase, which does not accept
    /// uploads.
    pub async fn publish_merged(&self, merged: MergedDocument) -> Option<Uuid> {
        let mut phase = self.phase.write().await;
        if matches!(*phase, BookletPhase::AutoLoaded(_)) {
            return None;
        }

        let artifact = Artifact::new(merged, self.config.output.merged_filename.clone());
        let id = artifact.id;
        *phase = BookletPhase::Merged(artifact);
        Some(id)
    }

    /// Resolve a download id against the current artifact.
    ///
    /// Returns `None` if the id is not a valid UUID, no artifact exists, or
    /// the id belongs to a replaced (invalidated) artifact.
    pub async fn resolve_artifact(&self, id: &str) -> Option<Artifact> {
        let id = Uuid::parse_str(id).ok()?;
        let phase = self.phase.read().await;
        let artifact = match &*phase {
            BookletPhase::AwaitingUpload => None,
            BookletPhase::AutoLoaded(artifact) | BookletPhase::Merged(artifact) => Some(artifact),
        }?;

        (artifact.id == id).then(|| artifact.clone())
    }

    /// Snapshot the current phase for rendering.
    pub async fn phase_view(&self) -> PhaseView {
        let phase = self.phase.read().await;
        match &*phase {
            BookletPhase::AwaitingUpload => PhaseView {
                auto_loaded: false,
                download: None,
            },
            BookletPhase::AutoLoaded(artifact) => PhaseView {
                auto_loaded: true,
                download: Some(DownloadView {
                    id: artifact.id,
                    filename: artifact.filename.clone(),
                    page_count: artifact.page_count,
                }),
            },
            BookletPhase::Merged(artifact) => PhaseView {
                auto_loaded: false,
                download: Some(DownloadView {
                    id: artifact.id,
                    filename: artifact.filename.clone(),
                    page_count: artifact.page_count,
                }),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn merged(pages: usize) -> MergedDocument {
        MergedDocument {
            bytes: vec![0x25, 0x50, 0x44, 0x46],
            page_count: pages,
        }
    }

    #[tokio::test]
    async fn publishing_replaces_and_invalidates_the_previous_handle() {
        let state = AppState::new(AppConfig::default());

        let first = state.publish_merged(merged(2)).await.unwrap();
        assert!(state.resolve_artifact(&first.to_string()).await.is_some());

        let second = state.publish_merged(merged(3)).await.unwrap();
        assert!(state.resolve_artifact(&first.to_string()).await.is_none());

        let current = state.resolve_artifact(&second.to_string()).await.unwrap();
        assert_eq!(current.page_count, 3);
        assert_eq!(current.filename, "zine-printable.pdf");
    }

    #[tokio::test]
    async fn auto_loaded_phase_rejects_uploads() {
        let state = AppState::new(AppConfig::default());

        let id = state.publish_auto_loaded(merged(8)).await;
        assert!(state.publish_merged(merged(1)).await.is_none());

        // The auto-loaded artifact stays current.
        let current = state.resolve_artifact(&id.to_string()).await.unwrap();
        assert_eq!(current.page_count, 8);
        assert_eq!(current.filename, "grow_shelf_zine_printable.pdf");
    }

    #[tokio::test]
    async fn unknown_and_garbage_ids_do_not_resolve() {
        let state = AppState::new(AppConfig::default());
        state.publish_merged(merged(1)).await.unwrap();

        assert!(state.resolve_artifact("not-a-uuid").await.is_none());
        assert!(state
            .resolve_artifact(&Uuid::new_v4().to_string())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn phase_view_tracks_the_state_machine() {
        let state = AppState::new(AppConfig::default());

        let view = state.phase_view().await;
        assert!(!view.auto_loaded);
        assert!(view.download.is_none());

        state.publish_merged(merged(4)).await.unwrap();
        let view = state.phase_view().await;
        assert!(!view.auto_loaded);
        assert_eq!(view.download.unwrap().page_count, 4);
    }
}
