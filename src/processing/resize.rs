//! Logo resampling.

use image::RgbaImage;
use image::imageops::{self, FilterType};
use crate::utils::StamperError;

type Result<T> = std::result::Result<T, StamperError>;

/// Resampling kernel used for the logo. Lanczos3 keeps edges crisp when
/// shrinking large logos down to watermark size.
pub const LOGO_FILTER: FilterType = FilterType::Lanczos3;

/// Returns a private copy of `logo` resized to exactly `width` x `height`.
///
/// The source is never modified. A zero target dimension is an error since
/// there is nothing to draw.
pub fn resize_logo(logo: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(StamperError::processing(format!(
            "Logo would be resized to {width}x{height}"
        )));
    }

    if logo.dimensions() == (width, height) {
        return Ok(logo.clone());
    }

    Ok(imageops::resize(logo, width, height, LOGO_FILTER))
}
