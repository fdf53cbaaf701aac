use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use image::RgbaImage;
use tracing::{info, warn};

use crate::error::{Error, Result};

pub fn calculate_resize_dimensions(
    original_cols: usize,
    original_rows: usize,
    target_size: usize,
) -> (usize, usize) {
    let short_side = original_rows.min(original_cols);
    let long_side = original_rows.max(original_cols);

    if target_size > long_side {
        warn!(
            "Target size {} is larger than original long side {}. Keeping original dimensions {}x{}",
            target_size, long_side, original_cols, original_rows
        );
        return (original_cols, original_rows);
    }

    let scale_factor = target_size as f64 / long_side as f64;
    let new_short_side = ((short_side as f64 * scale_factor).round() as usize).max(1);

    if original_cols >= original_rows {
        (target_size, new_short_side)
    } else {
        (new_short_side, target_size)
    }
}

/// Lanczos3 resize of an RGBA image; alpha is premultiplied during
/// convolution so transparent pixels do not bleed color.
pub fn resize_rgba_image(image: &RgbaImage, target_cols: u32, target_rows: u32) -> Result<RgbaImage> {
    let resize_options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    let mut resizer = Resizer::new();

    let src_image = Image::from_vec_u8(
        image.width(),
        image.height(),
        image.as_raw().clone(),
        PixelType::U8x4,
    )
    .map_err(|e| Error::Resize(e.to_string()))?;
    let mut dst_image = Image::new(target_cols, target_rows, PixelType::U8x4);
    resizer
        .resize(&src_image, &mut dst_image, &resize_options)
        .map_err(|e| Error::Resize(e.to_string()))?;

    RgbaImage::from_raw(target_cols, target_rows, dst_image.into_vec())
        .ok_or_else(|| Error::Resize("resized buffer has unexpected length".to_string()))
}

/// Downscale so the long side equals `target_size`; None keeps the original.
pub fn resize_to_long_side(image: RgbaImage, target_size: Option<usize>) -> Result<RgbaImage> {
    let Some(size) = target_size else {
        return Ok(image);
    };
    if size == 0 {
        return Err(Error::ZeroSize { size });
    }

    let (cols, rows) = (image.width() as usize, image.height() as usize);
    if cols.max(rows) == size {
        return Ok(image);
    }

    let (new_cols, new_rows) = calculate_resize_dimensions(cols, rows, size);
    if (new_cols, new_rows) == (cols, rows) {
        return Ok(image);
    }

    info!(
        "Original size: {}x{}, New size: {}x{}",
        cols, rows, new_cols, new_rows
    );
    resize_rgba_image(&image, new_cols as u32, new_rows as u32)
}
