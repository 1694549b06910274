//! Core stamping types.
//!
//! This module contains the value types shared by the pipeline:
//! - [`PlacementSpec`] and [`Anchor`]: where, how large and how opaque the logo is
//! - [`BatchRequest`] / [`BatchJob`]: a batch before and after setup
//! - [`LogoAsset`]: the decoded logo shared read-only by all workers
//! - [`ItemResult`] / [`BatchSummary`]: per-item and aggregate outcomes
//! - [`BatchEvent`]: the event stream a batch emits

mod types;
mod task;
mod progress;

pub use types::{Anchor, BatchSummary, ItemOutcome, ItemResult, PlacementSpec};
pub use task::{BatchJob, BatchRequest, LogoAsset};
pub use progress::{BatchEvent, Progress};
