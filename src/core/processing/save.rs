use std::path::Path;

use image::DynamicImage;
use tracing::info;

use crate::core::processing::resize::resize_to_long_side;
use crate::io::writers::write_png;
use crate::types::PngCompression;
use crate::error::Result;

/// Write one artifact, downscaling first when `target_size` is set.
pub fn save_artifact(
    image: &DynamicImage,
    output: &Path,
    target_size: Option<usize>,
    compression: PngCompression,
) -> Result<()> {
    match target_size {
        Some(_) => {
            let resized = resize_to_long_side(image.to_rgba8(), target_size)?;
            write_png(output, &DynamicImage::ImageRgba8(resized), compression)?;
        }
        None => write_png(output, image, compression)?,
    }
    info!(output = %output.display(), %compression, "Artifact saved");
    Ok(())
}
