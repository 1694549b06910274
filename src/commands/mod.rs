//! Command handlers behind the `image-stamper` binary.
//!
//! - [`stamp`]: resolve a request from saved settings and overrides, run one batch
//! - [`show_settings`] / [`update_settings`]: inspect and edit saved settings
//! - [`list_positions`]: valid anchor names

mod settings;
mod stamp;

pub use settings::{SettingsUpdate, list_positions, show_settings, update_settings};
pub use stamp::{ReportFormat, StampOptions, stamp};
