use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::core::Anchor;
use crate::settings::{SettingsStore, StamperSettings};
use crate::utils::{StamperError, StamperResult, validate_size_ratio};

/// Field-wise overrides for [`StamperSettings`]; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub input_dir: Option<String>,
    pub output_dir: Option<String>,
    pub logo_path: Option<String>,
    pub position: Option<Anchor>,
    pub logo_size_ratio: Option<f64>,
    pub opacity: Option<u8>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.input_dir.is_none()
            && self.output_dir.is_none()
            && self.logo_path.is_none()
            && self.position.is_none()
            && self.logo_size_ratio.is_none()
            && self.opacity.is_none()
    }

    /// Applies the overrides. The size ratio is checked before any field changes.
    pub fn apply(&self, settings: &mut StamperSettings) -> StamperResult<()> {
        if let Some(ratio) = self.logo_size_ratio {
            validate_size_ratio(ratio)?;
        }

        if let Some(dir) = &self.input_dir {
            settings.input_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        if let Some(logo) = &self.logo_path {
            settings.logo_path = logo.clone();
        }
        if let Some(anchor) = self.position {
            settings.position = anchor.to_string();
        }
        if let Some(ratio) = self.logo_size_ratio {
            settings.logo_size_ratio = ratio;
        }
        if let Some(opacity) = self.opacity {
            settings.opacity = opacity;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SettingsView<'a> {
    path: &'a Path,
    settings: &'a StamperSettings,
}

/// Saved settings (or defaults) with the file they come from, as pretty JSON.
pub fn show_settings(store: &SettingsStore) -> StamperResult<String> {
    let settings = store.load_or_default();
    let view = SettingsView { path: store.path(), settings: &settings };
    serde_json::to_string_pretty(&view)
        .map_err(|e| StamperError::settings(e.to_string()))
}

/// Loads, updates and saves settings in one step.
pub fn update_settings(store: &SettingsStore, update: &SettingsUpdate) -> StamperResult<StamperSettings> {
    let mut settings = store.load_or_default();
    update.apply(&mut settings)?;
    store.save(&settings)?;
    info!("Settings saved to {}", store.path().display());
    Ok(settings)
}

pub fn list_positions() -> Vec<&'static str> {
    Anchor::ALL.iter().map(|anchor| anchor.as_str()).collect()
}
