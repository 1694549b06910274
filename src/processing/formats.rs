//! JPEG output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use crate::utils::StamperError;

type Result<T> = std::result::Result<T, StamperError>;

/// Default JPEG quality for stamped outputs.
pub const DEFAULT_JPEG_QUALITY: u8 = 100;

/// Encodes `image` as a baseline JPEG at `quality` (1-100) into memory.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
        encoder
            .encode_image(image)
            .map_err(|e| StamperError::processing(format!("JPEG encode failed: {e}")))?;
    }
    Ok(buf)
}

/// Writes already encoded bytes to `output_path`, replacing any existing file.
pub fn write_output(bytes: &[u8], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)
        .map_err(|e| StamperError::io(format!("Cannot create {}: {e}", output_path.display())))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| StamperError::io(format!("Cannot write {}: {e}", output_path.display())))
}
