use serde::{Serialize, Deserialize};
use crate::processing::formats::DEFAULT_JPEG_QUALITY;
use crate::utils::{StamperResult, ValidationError};
use crate::worker::DEFAULT_WORKERS;

/// Execution settings for a batch; independent of what is being stamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchConfig {
    /// Upper bound on items processed at the same time
    pub max_workers: usize,
    /// JPEG quality for outputs (1-100)
    pub jpeg_quality: u8,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_WORKERS,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> StamperResult<()> {
        if self.max_workers == 0 {
            return Err(ValidationError::settings("Worker count must be at least 1").into());
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(ValidationError::settings(format!(
                "Invalid quality value: {}. Must be between 1 and 100",
                self.jpeg_quality
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_eight_workers_at_max_quality() {
        let config = BatchConfig::default();
        assert_eq!(config.max_workers, 8);
        assert_eq!(config.jpeg_quality, 100);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_zero_workers_and_bad_quality() {
        assert!(BatchConfig { max_workers: 0, ..Default::default() }.validate().is_err());
        assert!(BatchConfig { jpeg_quality: 0, ..Default::default() }.validate().is_err());
        assert!(BatchConfig { jpeg_quality: 101, ..Default::default() }.validate().is_err());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: BatchConfig = serde_json::from_str(r#"{ "maxWorkers": 2 }"#).unwrap();
        assert_eq!(config, BatchConfig { max_workers: 2, jpeg_quality: 100 });
    }
}
