//! Alpha attenuation and over-compositing of the logo onto a base image.

use image::{DynamicImage, RgbImage, RgbaImage};

/// Scales every pixel's alpha by `opacity / 255`, truncating.
///
/// `opacity == 255` leaves the image untouched.
pub fn apply_opacity(mut logo: RgbaImage, opacity: u8) -> RgbaImage {
    if opacity == u8::MAX {
        return logo;
    }

    let opacity = opacity as u16;
    for pixel in logo.pixels_mut() {
        pixel[3] = (pixel[3] as u16 * opacity / 255) as u8;
    }
    logo
}

/// Draws `logo` over a copy of `base` with its top-left corner at (`x`, `y`).
///
/// The logo's alpha is the blend mask: each colour channel becomes
/// `logo * a + base * (255 - a)`, whatever the base alpha is, so a transparent
/// base area still shows the logo at its attenuated strength. Alpha is
/// combined as "over", which keeps an opaque base opaque. Logo pixels outside
/// the canvas are clipped.
pub fn composite(base: &RgbaImage, logo: &RgbaImage, x: i64, y: i64) -> RgbaImage {
    let mut canvas = base.clone();
    let (base_w, base_h) = (base.width() as i64, base.height() as i64);
    let (logo_w, logo_h) = (logo.width() as i64, logo.height() as i64);

    let (left, top) = (x.max(0), y.max(0));
    let (right, bottom) = ((x + logo_w).min(base_w), (y + logo_h).min(base_h));

    for cy in top..bottom {
        for cx in left..right {
            let fg = logo.get_pixel((cx - x) as u32, (cy - y) as u32);
            let bg = canvas.get_pixel_mut(cx as u32, cy as u32);
            let mask = fg[3] as u32;
            for c in 0..3 {
                bg[c] = blend(fg[c], bg[c], mask);
            }
            bg[3] = blend(u8::MAX, bg[3], mask);
        }
    }
    canvas
}

/// `fg * mask + bg * (255 - mask)`, rounded, in 0..=255.
fn blend(fg: u8, bg: u8, mask: u32) -> u8 {
    ((fg as u32 * mask + bg as u32 * (255 - mask) + 127) / 255) as u8
}

/// Drops the alpha channel so the canvas can be written as JPEG.
pub fn flatten(canvas: RgbaImage) -> RgbImage {
    DynamicImage::ImageRgba8(canvas).into_rgb8()
}
