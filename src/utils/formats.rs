use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use crate::utils::StamperError;

/// Input formats accepted by the batch. Outputs are always JPEG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    PNG,
    JPEG,
    BMP,
    GIF,
}

impl InputFormat {
    pub const ALL: [InputFormat; 4] = [Self::PNG, Self::JPEG, Self::BMP, Self::GIF];

    /// Get file extensions associated with this format
    pub fn extensions(&self) -> &[&str] {
        match self {
            Self::PNG => &["png"],
            Self::JPEG => &["jpg", "jpeg"],
            Self::BMP => &["bmp"],
            Self::GIF => &["gif"],
        }
    }

    /// Check if the extension matches this format
    pub fn matches_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions().contains(&ext.as_str())
    }
}

impl FromStr for InputFormat {
    type Err = StamperError;

    fn from_str(ext: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.matches_extension(ext))
            .ok_or_else(|| StamperError::format(format!("Unsupported image format: {}", ext.to_lowercase())))
    }
}

/// Get format from file extension
pub fn format_from_extension(path: impl AsRef<Path>) -> Result<InputFormat, StamperError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| StamperError::format(
            format!("File has no extension: {}", path.display())
        ))?;

    InputFormat::from_str(ext)
}

/// Whether a file name carries one of the supported input extensions (case-insensitive).
pub fn is_supported_input(path: impl AsRef<Path>) -> bool {
    format_from_extension(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_match_case_insensitively() {
        assert!(is_supported_input("a.PNG"));
        assert!(is_supported_input("b.Jpeg"));
        assert!(is_supported_input("c.jpg"));
        assert!(is_supported_input("d.bmp"));
        assert!(is_supported_input("e.GIF"));
        assert!(InputFormat::JPEG.matches_extension("JPG"));
    }

    #[test]
    fn unsupported_or_missing_extensions_are_rejected() {
        assert!(!is_supported_input("notes.txt"));
        assert!(!is_supported_input("photo.webp"));
        assert!(!is_supported_input("README"));
        assert!(!is_supported_input(".png.bak"));
    }

    #[test]
    fn every_format_round_trips_through_its_extensions() {
        for format in InputFormat::ALL {
            for ext in format.extensions() {
                assert_eq!(ext.parse::<InputFormat>().unwrap(), format);
            }
        }
    }
}
