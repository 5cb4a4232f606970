use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use fractalvis_core::{Bounds, RawParams};

/// Errors from reading or writing the preferences file.
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("preferences I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("preferences are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    /// Parameter text the input fields start with.
    #[serde(default)]
    pub default_params: RawParams,
    #[serde(default = "default_true")]
    pub restore_last_view: bool,
    /// Bounds on screen when the previous session ended.
    #[serde(default)]
    pub last_bounds: Option<Bounds>,
}

fn default_window_width() -> f32 {
    1024.0
}
fn default_window_height() -> f32 {
    800.0
}
fn default_true() -> bool {
    true
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            default_params: RawParams::default(),
            restore_last_view: true,
            last_bounds: None,
        }
    }
}

impl AppPreferences {
    /// Load preferences from the config directory, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            debug!("No preferences file at {}", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(prefs) => {
                info!("Loaded preferences from {}", path.display());
                prefs
            }
            Err(e) => {
                error!("Failed to load preferences: {e}");
                Self::default()
            }
        }
    }

    /// Persist preferences to the config directory.
    pub fn save(&self) {
        let path = config_path();
        match self.save_to(&path) {
            Ok(()) => debug!("Saved preferences"),
            Err(e) => error!("Failed to save preferences: {e}"),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, PreferencesError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Bounds a new session should open on.
    pub fn starting_bounds(&self) -> Bounds {
        match (self.restore_last_view, self.last_bounds) {
            (true, Some(bounds)) => bounds,
            _ => Bounds::DEFAULT,
        }
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::config_directory().join("preferences.json")
}
