//! Editor configuration loaded from JSON with environment overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_SERVER_URL, SEEK_STEP_SECONDS, VOLUME_MAX,
    ZOOM_DEFAULT_PX_PER_SEC,
};

pub const SERVER_URL_ENV: &str = "PITCH_EDITOR_SERVER";
pub const DEFAULT_HISTORY_FILE: &str = "pitch-editor-history.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Base URL of the processing backend.
    pub server_url: String,
    pub poll_interval_ms: u64,
    /// Initial zoom in pixels per second.
    pub default_zoom: f64,
    /// Initial volume (0-100).
    pub default_volume: f64,
    pub seek_step_seconds: f64,
    /// Where the project history list is persisted. `None` means
    /// `pitch-editor-history.json` in the working directory.
    pub history_path: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            default_zoom: ZOOM_DEFAULT_PX_PER_SEC,
            default_volume: VOLUME_MAX,
            seek_step_seconds: SEEK_STEP_SECONDS,
            history_path: None,
        }
    }
}

impl EditorConfig {
    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> io::Result<Self> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(err),
        };
        serde_json::from_str(&json).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Apply `PITCH_EDITOR_SERVER` when set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                self.server_url = trimmed.to_string();
            }
        }
        self
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn history_file(&self) -> PathBuf {
        self.history_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_FILE))
    }
}
