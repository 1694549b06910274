//! The stamping pipeline.
//!
//! - [`geometry`]: logo size and anchor position for a given base image
//! - [`compositor`]: alpha attenuation, over-compositing and flattening
//! - [`executor`]: one input file end to end, failures captured per item
//! - [`batch`]: bounded-concurrency fan-out over a directory with an event stream

pub mod batch;
pub mod compositor;
pub mod executor;
pub mod formats;
pub mod geometry;
pub mod resize;

pub use batch::{BatchConfig, BatchCoordinator, BatchHandle};
pub use executor::process_item;
pub use geometry::{Placement, resolve_placement, resolve_placement_named};
