//! Acquisition of the preconfigured booklet.
//!
//! On startup the app looks for a booklet at a fixed well-known location.
//! [`BookletSource`] abstracts where that location is (HTTP URL or local
//! file); [`auto_load`] fetches and normalizes whatever it finds.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::AutoLoadConfig;
use crate::error::Result;
use crate::pdf::{passthrough_copy, MergedDocument};

/// A place the preconfigured booklet may be fetched from.
///
/// Retrieval failure of any kind - absent resource, network error,
/// non-success response - is a normal outcome and maps to `None`, never to
/// an error.
#[async_trait]
pub trait BookletSource: Send + Sync {
    async fn fetch(&self) -> Option<Vec<u8>>;

    /// Short name for logging
    fn name(&self) -> &'static str;
}

/// Fetches the booklet over HTTP with cache-bypassing semantics.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl BookletSource for HttpSource {
    async fn fetch(&self) -> Option<Vec<u8>> {
        let response = match self
            .client
            .get(&self.url)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                debug!("Booklet fetch from {} failed: {}", self.url, e);
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(
                "Booklet fetch from {} returned {}",
                self.url,
                response.status()
            );
            return None;
        }

        match response.bytes().await {
            Ok(body) => Some(body.to_vec()),
            Err(e) => {
                debug!("Booklet body read from {} failed: {}", self.url, e);
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Reads the booklet from a local path.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BookletSource for FileSource {
    async fn fetch(&self) -> Option<Vec<u8>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!("Booklet read from {} failed: {}", self.path.display(), e);
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

/// Pick a source from configuration.
///
/// A configured URL wins over a path; with neither, auto-loading is
/// disabled and `None` is returned.
pub fn create_source(config: &AutoLoadConfig) -> Option<Arc<dyn BookletSource>> {
    if let Some(url) = &config.url {
        return Some(Arc::new(HttpSource::new(url.clone())));
    }

    config
        .path
        .as_ref()
        .map(|path| Arc::new(FileSource::new(path.clone())) as Arc<dyn BookletSource>)
}

/// Try to acquire and normalize the preconfigured booklet.
///
/// `Ok(None)` means no booklet is available, which callers treat as a
/// silent fallback to upload mode. `Err` means a booklet was fetched but
/// did not parse as a PDF.
pub async fn auto_load(source: &dyn BookletSource) -> Result<Option<MergedDocument>> {
    let Some(bytes) = source.fetch().await else {
        info!(
            "No preconfigured booklet available via {} source",
            source.name()
        );
        return Ok(None);
    };

    info!(
        "Loaded preconfigured booklet via {} source ({} bytes)",
        source.name(),
        bytes.len()
    );

    let merged = passthrough_copy(&bytes)?;
    Ok(Some(merged))
}
