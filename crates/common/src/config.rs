//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// On-disk locations of the session artifacts.
    pub artifacts: ArtifactPaths,

    /// Log and screenshot rate limits.
    pub cadence: CadenceConfig,

    /// Screenshot capture and annotation settings.
    pub screenshot: ScreenshotConfig,

    /// Remote upload endpoints.
    pub upload: UploadConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Fixed paths of the session log, screenshot directory and archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    /// Append-only gaze log.
    pub log_file: PathBuf,

    /// Directory holding annotated screenshots.
    pub screenshots_dir: PathBuf,

    /// Archive built at finalize time.
    pub archive_file: PathBuf,
}

/// Rate limits for the two recurring actions of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    /// Minimum wall-clock gap between two gaze log lines.
    pub log_interval_ms: u64,

    /// Counter value a screenshot trigger waits for (face frames).
    pub screenshot_frame_threshold: u32,
}

/// Screenshot capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    /// TrueType font candidates for the timestamp overlay, tried in order.
    pub font_paths: Vec<PathBuf>,

    /// Overlay font size in pixels.
    pub font_size: f32,

    /// Screen grabber argv writing a PNG to stdout. Autodetected when unset.
    pub capture_command: Option<Vec<String>>,
}

/// Remote endpoints used during finalize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Service issuing one-time upload URLs.
    pub destination_url: String,

    /// Plain-text "what is my IP" endpoint.
    pub external_ip_url: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "gazelog=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("iris_data.csv"),
            screenshots_dir: PathBuf::from("screenshots"),
            archive_file: PathBuf::from("iris_data.zip"),
        }
    }
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            log_interval_ms: 200,
            screenshot_frame_threshold: 300,
        }
    }
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            font_paths: vec![
                PathBuf::from("DejaVuSans.ttf"),
                PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"),
                PathBuf::from("/usr/share/fonts/TTF/DejaVuSans.ttf"),
                PathBuf::from("/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf"),
                PathBuf::from("/Library/Fonts/Arial.ttf"),
            ],
            font_size: 60.0,
            capture_command: None,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            destination_url: "https://opthurh53e.execute-api.us-east-1.amazonaws.com/generate-url"
                .to_string(),
            external_ip_url: "https://api.ipify.org".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&config_file_path())
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("gazelog").join("config.json")
}
