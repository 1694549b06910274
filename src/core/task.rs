//! Batch request and job definitions.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use image::RgbaImage;
use serde::Serialize;
use crate::core::PlacementSpec;
use crate::utils::{StamperError, StamperResult, ValidationError};

/// What the caller asks for: paths plus placement, before anything is loaded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    /// Directory scanned (non-recursively) for input images
    pub input_dir: PathBuf,
    /// Directory the stamped JPEGs are written to; created when missing
    pub output_dir: PathBuf,
    /// Logo image, ideally a PNG with transparency
    pub logo_path: PathBuf,
    pub placement: PlacementSpec,
}

/// The decoded logo, shared read-only by every worker of a batch.
#[derive(Debug)]
pub struct LogoAsset {
    image: RgbaImage,
}

impl LogoAsset {
    /// Decodes the logo file and converts it to RGBA.
    pub fn open(path: impl AsRef<Path>) -> StamperResult<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            return Err(ValidationError::not_a_file(path).into());
        }
        let image = image::open(path)?.to_rgba8();
        Self::from_image(image)
    }

    /// Wraps an already decoded logo. Zero-sized logos are rejected since they
    /// have no aspect ratio.
    pub fn from_image(image: RgbaImage) -> StamperResult<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(StamperError::format("Logo has zero width or height"));
        }
        Ok(Self { image })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// An immutable batch: built once by the coordinator after the output directory
/// exists, the logo decoded and the input directory listed.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub logo: Arc<LogoAsset>,
    pub placement: PlacementSpec,
    /// Eligible inputs in discovery order
    pub files: Arc<[PathBuf]>,
}

impl BatchJob {
    pub fn total_files(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn logo_rejects_zero_sized_images() {
        assert!(LogoAsset::from_image(RgbaImage::new(0, 4)).is_err());
        let logo = LogoAsset::from_image(RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]))).unwrap();
        assert_eq!(logo.dimensions(), (3, 2));
    }

    #[test]
    fn logo_open_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = LogoAsset::open(dir.path().join("logo.png")).unwrap_err();
        assert!(matches!(err, StamperError::IO(_)));
    }

    #[test]
    fn logo_open_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let err = LogoAsset::open(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Not a file"), "{err}");
    }

    #[test]
    fn logo_open_converts_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        image::RgbImage::from_pixel(4, 2, image::Rgb([9, 8, 7])).save(&path).unwrap();

        let logo = LogoAsset::open(&path).unwrap();
        assert_eq!(logo.dimensions(), (4, 2));
        assert_eq!(logo.image().get_pixel(0, 0), &Rgba([9, 8, 7, 255]));
    }
}
