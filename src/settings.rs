//! Persisted user preferences.
//!
//! Settings live outside the pipeline: they are loaded once at startup, turned
//! into a [`BatchRequest`] and saved only when explicitly asked to.

use std::fs;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{Anchor, BatchRequest, PlacementSpec};
use crate::utils::{StamperError, StamperResult, ValidationError};

const SETTINGS_FILE: &str = "settings.json";

/// Ratio used when an existing settings file lacks the key.
fn fallback_size_ratio() -> f64 {
    0.1
}

fn default_opacity() -> u8 {
    128
}

fn default_position() -> String {
    Anchor::default().to_string()
}

/// The saved form of the stamper's inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StamperSettings {
    #[serde(default)]
    pub input_dir: String,
    #[serde(default)]
    pub output_dir: String,
    #[serde(default)]
    pub logo_path: String,
    #[serde(default = "default_position")]
    pub position: String,
    #[serde(default = "fallback_size_ratio")]
    pub logo_size_ratio: f64,
    #[serde(default = "default_opacity")]
    pub opacity: u8,
}

impl Default for StamperSettings {
    fn default() -> Self {
        Self {
            input_dir: String::new(),
            output_dir: String::new(),
            logo_path: String::new(),
            position: default_position(),
            logo_size_ratio: 0.15,
            opacity: default_opacity(),
        }
    }
}

impl StamperSettings {
    /// Builds a validated batch request.
    pub fn to_request(&self) -> StamperResult<BatchRequest> {
        let input_dir = required_path(&self.input_dir, "Please select an input directory.")?;
        let output_dir = required_path(&self.output_dir, "Please select an output directory.")?;
        let logo_path = required_path(&self.logo_path, "Please select a logo image.")?;

        let anchor = self.position.parse::<Anchor>()?;
        let placement = PlacementSpec::new(anchor, self.logo_size_ratio, self.opacity)?;

        Ok(BatchRequest { input_dir, output_dir, logo_path, placement })
    }
}

fn required_path(value: &str, message: &str) -> StamperResult<PathBuf> {
    if value.trim().is_empty() {
        return Err(ValidationError::settings(message).into());
    }
    Ok(PathBuf::from(value))
}

/// Reads and writes [`StamperSettings`] as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the per-user config location, e.g. `~/.config/imagestamper/settings.json`.
    pub fn user_default() -> StamperResult<Self> {
        let dirs = ProjectDirs::from("", "maplenetwork", "ImageStamper")
            .ok_or_else(|| StamperError::settings("Could not determine the user config directory"))?;
        Ok(Self::new(dirs.config_dir().join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads saved settings; `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> StamperResult<Option<StamperSettings>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)
            .map_err(|e| StamperError::settings(format!("Cannot read {}: {e}", self.path.display())))?;
        let settings = serde_json::from_str(&text)
            .map_err(|e| StamperError::settings(format!("Cannot parse {}: {e}", self.path.display())))?;
        debug!("Loaded settings from {}", self.path.display());
        Ok(Some(settings))
    }

    /// Loads saved settings, falling back to defaults when missing or unreadable.
    pub fn load_or_default(&self) -> StamperSettings {
        match self.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => {
                debug!("No existing settings found. Using default values.");
                StamperSettings::default()
            }
            Err(e) => {
                warn!("Error loading settings: {}", e);
                StamperSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &StamperSettings) -> StamperResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StamperError::settings(format!("Cannot create {}: {e}", parent.display()))
            })?;
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| StamperError::settings(e.to_string()))?;
        fs::write(&self.path, text)
            .map_err(|e| StamperError::settings(format!("Cannot write {}: {e}", self.path.display())))?;
        debug!("Settings saved to {}", self.path.display());
        Ok(())
    }
}
