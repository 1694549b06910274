use std::path::PathBuf;
use serde::Serialize;
use crate::core::{BatchSummary, ItemResult};

/// Events emitted by a running batch, in emission order.
///
/// `Finished` is always the last event of a batch that got past setup;
/// `Fatal` replaces it when setup failed and nothing was dispatched.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BatchEvent {
    #[serde(rename_all = "camelCase")]
    Started {
        total_files: usize,
        input_dir: PathBuf,
        output_dir: PathBuf,
    },
    #[serde(rename_all = "camelCase")]
    Item {
        result: ItemResult,
        #[serde(flatten)]
        progress: Progress,
    },
    Fatal {
        reason: String,
    },
    Finished {
        summary: BatchSummary,
    },
}

impl BatchEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Fatal { .. } | Self::Finished { .. })
    }
}

/// Completion counters attached to every item event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Number of items that produced a result so far
    pub completed: usize,
    /// Total number of eligible files
    pub total: usize,
    /// Progress percentage (0-100)
    pub progress_percentage: usize,
}

impl Progress {
    pub fn new(completed: usize, total: usize) -> Self {
        let progress_percentage = if total > 0 {
            (completed * 100) / total
        } else {
            0
        };

        Self {
            completed,
            total,
            progress_percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_truncates_and_handles_empty_batches() {
        assert_eq!(Progress::new(1, 3).progress_percentage, 33);
        assert_eq!(Progress::new(3, 3).progress_percentage, 100);
        assert_eq!(Progress::new(0, 0).progress_percentage, 0);
    }

    #[test]
    fn item_event_flattens_progress() {
        let event = BatchEvent::Item {
            result: ItemResult::failure("a.png".into(), PathBuf::from("a.png"), "boom"),
            progress: Progress::new(1, 2),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "item");
        assert_eq!(json["completed"], 1);
        assert_eq!(json["total"], 2);
        assert_eq!(json["progressPercentage"], 50);
        assert!(!event.is_terminal());
    }

    #[test]
    fn terminal_events() {
        assert!(BatchEvent::Fatal { reason: "x".into() }.is_terminal());
        assert!(BatchEvent::Finished { summary: BatchSummary::default() }.is_terminal());
    }
}
