use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the preconfigured booklet is looked for on startup.
///
/// A `url` is fetched with cache-bypassing semantics; a `path` is read from
/// the local filesystem. The URL takes precedence when both are set. With
/// neither set, auto-loading is disabled and the app starts in upload mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoLoadConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_autoload_path")]
    pub path: Option<PathBuf>,
}

fn default_autoload_path() -> Option<PathBuf> {
    Some(PathBuf::from("static/grow_shelf_zine.pdf"))
}

impl Default for AutoLoadConfig {
    fn default() -> Self {
        Self {
            url: None,
            path: default_autoload_path(),
        }
    }
}

/// Suggested filenames for the downloadable booklet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Filename offered for an auto-loaded booklet
    #[serde(default = "default_auto_filename")]
    pub auto_filename: String,

    /// Filename offered for a manually merged booklet
    #[serde(default = "default_merged_filename")]
    pub merged_filename: String,
}

fn default_auto_filename() -> String {
    "grow_shelf_zine_printable.pdf".to_string()
}

fn default_merged_filename() -> String {
    "zine-printable.pdf".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            auto_filename: default_auto_filename(),
            merged_filename: default_merged_filename(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Preconfigured booklet location
    #[serde(default)]
    pub autoload: AutoLoadConfig,

    /// Download filenames
    #[serde(default)]
    pub output: OutputConfig,

    /// Maximum accepted upload body in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

const fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            autoload: AutoLoadConfig::default(),
            output: OutputConfig::default(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        toml::from_str(&content)
            .map_err(|e| crate::error::Error::ConfigLoad(format!("Failed to parse config: {e}")))
    }

    /// Load from default locations (~/.config/zine-maker/config.toml, ./config.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("zine-maker").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Try local config
        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        // Return defaults
        tracing::debug!("No config file found, using defaults");
        Self::default()
    }
}
