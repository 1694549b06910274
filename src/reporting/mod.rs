pub mod reporter;

pub use reporter::{BatchReporter, ConsoleReporter, JsonReporter, drain_events};
