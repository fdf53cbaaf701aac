use std::path::Path;

use image::{DynamicImage, ImageReader};
use tracing::debug;

use crate::error::Result;

/// Raster extensions picked up by directory scans (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "webp", "tif", "tiff", "jpg", "jpeg"];

pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}

/// Decode an image, guessing the format from its content rather than its name.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "Image loaded"
    );
    Ok(img)
}
