//! Core types for placement settings and per-item results.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::utils::{StamperError, StamperResult};

/// Named corner (or center) the logo is pinned to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
    Center,
}

impl Anchor {
    /// All anchors, in the order a picker should offer them.
    pub const ALL: [Anchor; 5] = [
        Self::BottomRight,
        Self::BottomLeft,
        Self::TopRight,
        Self::TopLeft,
        Self::Center,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BottomRight => "bottom-right",
            Self::BottomLeft => "bottom-left",
            Self::TopRight => "top-right",
            Self::TopLeft => "top-left",
            Self::Center => "center",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Anchor {
    type Err = StamperError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|anchor| anchor.as_str() == normalized)
            .ok_or_else(|| StamperError::invalid_anchor(name))
    }
}

/// Batch-wide placement parameters.
///
/// Built once per run through [`PlacementSpec::new`] and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementSpec {
    anchor: Anchor,
    size_ratio: f64,
    opacity: u8,
}

impl PlacementSpec {
    /// Creates a validated placement. `size_ratio` must be finite and in `(0, 1]`.
    pub fn new(anchor: Anchor, size_ratio: f64, opacity: u8) -> StamperResult<Self> {
        crate::utils::validate_size_ratio(size_ratio)?;
        Ok(Self { anchor, size_ratio, opacity })
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Logo width as a fraction of the base image's shorter side.
    pub fn size_ratio(&self) -> f64 {
        self.size_ratio
    }

    /// 0 (transparent) to 255 (logo alpha unchanged).
    pub fn opacity(&self) -> u8 {
        self.opacity
    }
}

/// How a single item ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ItemOutcome {
    #[serde(rename_all = "camelCase")]
    Success { output_path: PathBuf },
    Failure { reason: String },
}

/// Result of processing one input file. Produced exactly once per dispatched file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResult {
    /// File name of the input, without its directory
    pub filename: String,
    /// Full path of the input
    pub input_path: PathBuf,
    pub outcome: ItemOutcome,
}

impl ItemResult {
    pub fn success(filename: String, input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            filename,
            input_path,
            outcome: ItemOutcome::Success { output_path },
        }
    }

    pub fn failure(filename: String, input_path: PathBuf, reason: impl Into<String>) -> Self {
        Self {
            filename,
            input_path,
            outcome: ItemOutcome::Failure { reason: reason.into() },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Success { .. })
    }
}

/// Aggregate counts for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Number of eligible files found
    pub total_files: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Eligible files never dispatched because the batch was cancelled
    pub cancelled: usize,
    /// Wall-clock time for the batch in milliseconds
    pub elapsed_ms: u64,
}

impl BatchSummary {
    /// Items that produced a result.
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// `true` when every eligible file produced a result.
    pub fn is_complete(&self) -> bool {
        self.processed() == self.total_files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_parses_case_insensitively_and_displays_canonically() {
        assert_eq!("Bottom-Right".parse::<Anchor>().unwrap(), Anchor::BottomRight);
        assert_eq!(" center ".parse::<Anchor>().unwrap(), Anchor::Center);
        for anchor in Anchor::ALL {
            assert_eq!(anchor.to_string().parse::<Anchor>().unwrap(), anchor);
        }
    }

    #[test]
    fn unknown_anchor_is_rejected() {
        let err = "middle".parse::<Anchor>().unwrap_err();
        assert!(matches!(err, StamperError::InvalidAnchor(ref name) if name == "middle"));
        assert!("bottom_right".parse::<Anchor>().is_err());
    }

    #[test]
    fn anchor_serializes_as_kebab_case() {
        assert_eq!(serde_json::to_string(&Anchor::TopLeft).unwrap(), "\"top-left\"");
        let parsed: Anchor = serde_json::from_str("\"bottom-left\"").unwrap();
        assert_eq!(parsed, Anchor::BottomLeft);
    }

    #[test]
    fn placement_rejects_out_of_range_ratio() {
        assert!(PlacementSpec::new(Anchor::Center, 0.0, 128).is_err());
        assert!(PlacementSpec::new(Anchor::Center, -0.1, 128).is_err());
        assert!(PlacementSpec::new(Anchor::Center, 1.5, 128).is_err());
        assert!(PlacementSpec::new(Anchor::Center, f64::NAN, 128).is_err());
        let spec = PlacementSpec::new(Anchor::Center, 1.0, 0).unwrap();
        assert_eq!(spec.size_ratio(), 1.0);
        assert_eq!(spec.opacity(), 0);
    }

    #[test]
    fn item_outcome_serializes_with_status_tag() {
        let result = ItemResult::failure("x.png".into(), PathBuf::from("/in/x.png"), "decode error: bad");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"]["status"], "failure");
        assert_eq!(json["outcome"]["reason"], "decode error: bad");
        assert!(!result.is_success());
    }
}
