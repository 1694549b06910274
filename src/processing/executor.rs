//! Single-item processing: decode, stamp, encode, write.
//!
//! Everything here is synchronous and CPU/IO bound; the batch coordinator runs
//! it inside `tokio::task::spawn_blocking` so the async runtime is never blocked.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::{ItemResult, LogoAsset, PlacementSpec};
use crate::utils::{ItemError, extract_filename, output_path_for};

use super::compositor::{apply_opacity, composite, flatten};
use super::formats::{encode_jpeg, write_output};
use super::geometry::resolve_placement;
use super::resize::resize_logo;

/// Stamps `logo` onto one input file and writes `<output_dir>/<stem>.jpg`.
///
/// Never fails: any error is captured into a failed [`ItemResult`] so that the
/// rest of the batch keeps going. The shared logo is only read.
pub fn process_item(
    input_path: &Path,
    output_dir: &Path,
    logo: &LogoAsset,
    placement: &PlacementSpec,
    jpeg_quality: u8,
) -> ItemResult {
    let filename = extract_filename(input_path);
    match stamp_single(input_path, output_dir, logo, placement, jpeg_quality) {
        Ok(output_path) => ItemResult::success(filename, input_path.to_path_buf(), output_path),
        Err(e) => ItemResult::failure(filename, input_path.to_path_buf(), e.to_string()),
    }
}

fn stamp_single(
    input_path: &Path,
    output_dir: &Path,
    logo: &LogoAsset,
    placement: &PlacementSpec,
    jpeg_quality: u8,
) -> Result<PathBuf, ItemError> {
    let base = image::open(input_path)
        .map_err(|e| ItemError::Decode(e.to_string()))?
        .to_rgba8();
    let (base_w, base_h) = base.dimensions();

    let (logo_w, logo_h) = logo.dimensions();
    let geometry = resolve_placement(
        base_w,
        base_h,
        logo_w,
        logo_h,
        placement.size_ratio(),
        placement.anchor(),
    );

    debug!(
        "Loaded '{}': {}×{}, logo {}×{} at ({}, {})",
        extract_filename(input_path),
        base_w,
        base_h,
        geometry.logo_width,
        geometry.logo_height,
        geometry.x,
        geometry.y
    );

    let resized = resize_logo(logo.image(), geometry.logo_width, geometry.logo_height)
        .map_err(|e| ItemError::Resize(e.to_string()))?;
    let stamp = apply_opacity(resized, placement.opacity());
    let canvas = flatten(composite(&base, &stamp, geometry.x, geometry.y));

    let bytes = encode_jpeg(&canvas, jpeg_quality).map_err(|e| ItemError::Encode(e.to_string()))?;

    let output_path = output_path_for(output_dir, input_path);
    write_output(&bytes, &output_path).map_err(|e| ItemError::Write(e.to_string()))?;

    debug!("'{}' → {}", extract_filename(input_path), output_path.display());
    Ok(output_path)
}
