//! Logo sizing and anchor placement.

use serde::Serialize;
use crate::core::Anchor;
use crate::utils::StamperResult;

/// Distance in pixels kept between the logo and the edges it is anchored to.
pub const EDGE_MARGIN: i64 = 10;

/// Resized logo dimensions and the top-left corner to draw it at.
///
/// Coordinates may be negative when the logo is larger than the base image
/// minus margins; the compositor clips whatever falls off-canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub logo_width: u32,
    pub logo_height: u32,
    pub x: i64,
    pub y: i64,
}

/// Computes the resized logo size and its position on a `base_w` x `base_h` image.
///
/// The logo width is `floor(min(base_w, base_h) * size_ratio)`; the height
/// follows the logo's own aspect ratio. Deterministic and side-effect free.
pub fn resolve_placement(
    base_w: u32,
    base_h: u32,
    logo_w: u32,
    logo_h: u32,
    size_ratio: f64,
    anchor: Anchor,
) -> Placement {
    let logo_width = (base_w.min(base_h) as f64 * size_ratio).floor() as u32;
    let aspect = logo_w as f64 / logo_h as f64;
    let logo_height = (logo_width as f64 / aspect).floor() as u32;

    let (base_w, base_h) = (base_w as i64, base_h as i64);
    let (w, h) = (logo_width as i64, logo_height as i64);

    let (x, y) = match anchor {
        Anchor::BottomRight => (base_w - w - EDGE_MARGIN, base_h - h - EDGE_MARGIN),
        Anchor::BottomLeft => (EDGE_MARGIN, base_h - h - EDGE_MARGIN),
        Anchor::TopRight => (base_w - w - EDGE_MARGIN, EDGE_MARGIN),
        Anchor::TopLeft => (EDGE_MARGIN, EDGE_MARGIN),
        // Floor division, so an oversized logo stays centered when the offset goes negative.
        Anchor::Center => ((base_w - w).div_euclid(2), (base_h - h).div_euclid(2)),
    };

    Placement { logo_width, logo_height, x, y }
}

/// Same as [`resolve_placement`], taking the anchor by name.
///
/// Fails with `InvalidAnchor` for anything other than the five anchor names.
pub fn resolve_placement_named(
    base_w: u32,
    base_h: u32,
    logo_w: u32,
    logo_h: u32,
    size_ratio: f64,
    anchor: &str,
) -> StamperResult<Placement> {
    let anchor = anchor.parse::<Anchor>()?;
    Ok(resolve_placement(base_w, base_h, logo_w, logo_h, size_ratio, anchor))
}
