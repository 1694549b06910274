// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod worker;
pub mod processing;
pub mod reporting;
pub mod settings;
pub mod commands;

// Public exports for external consumers
pub use crate::core::{Anchor, BatchEvent, BatchRequest, BatchSummary, ItemOutcome, ItemResult, PlacementSpec};
pub use processing::{BatchConfig, BatchCoordinator, BatchHandle, resolve_placement};
pub use reporting::{BatchReporter, ConsoleReporter, JsonReporter, drain_events};
pub use settings::{SettingsStore, StamperSettings};
pub use utils::{StamperError, StamperResult};

// This library file is the public API of the crate.
// The command-line entry point is in main.rs.
