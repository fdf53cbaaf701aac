//! Smooth, gap-free white outline synthesis.
//!
//! Stage order matters, each one cleaning up after the previous:
//! erode (fringe cleanup) -> dilate (band extent) -> blur + threshold
//! (rounded edge) -> blur + smooth (residual jaggedness) -> force interior.
use image::{DynamicImage, GrayImage, Rgba, RgbaImage, imageops};
use tracing::{debug, info, instrument};

use crate::core::processing::mask::OpacityMask;
use crate::core::processing::morphology::{
    dilate_passes, erode_passes, force_interior, gaussian_blur, smooth_more, three_way_threshold,
};
use crate::error::{Error, Result};
use crate::types::{OutlineOutcome, SkipReason};

/// Opacity at or below this is matting noise.
pub const BINARIZE_THRESHOLD: u8 = 20;
/// Opacity at or above this is solid artwork; between the two is fringe.
pub const FRINGE_OPAQUE: u8 = 240;
/// Radius of the 9x9 maximum filter used to grow the silhouette.
pub const DILATE_RADIUS: u8 = 4;
pub const FIRST_BLUR_SIGMA: f32 = 4.0;
pub const SECOND_BLUR_SIGMA: f32 = 2.0;
pub const SOLID_CUTOFF: u8 = 220;
pub const CLEAR_CUTOFF: u8 = 50;

/// Dilation that grows the eroded interior back past the subject edge and
/// then `outline_size` pixels further: `(full 9x9 passes, remainder radius)`.
///
/// The grown edge lands on the canvas margin at most; the blurs then put the
/// half-opacity edge of the band about `outline_size` out from the subject.
pub fn dilation_schedule(outline_size: u32, edge_buffer: u32) -> (u32, u8) {
    let growth = outline_size.saturating_add(edge_buffer);
    let radius = u32::from(DILATE_RADIUS);
    (growth / radius, (growth % radius) as u8)
}

/// Surround the artwork with a white band `outline_size` pixels thick.
///
/// The output canvas is `(width + 2 * outline_size) x (height + 2 * outline_size)`
/// with the artwork at offset `(outline_size, outline_size)`.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn synthesize_outline(
    image: &DynamicImage,
    outline_size: u32,
    edge_buffer: u32,
) -> Result<OutlineOutcome> {
    if !image.color().has_alpha() {
        debug!(color = ?image.color(), "No opacity channel, passing through");
        return Ok(OutlineOutcome::PassThrough(SkipReason::MissingOpacityChannel));
    }
    let rgba = image.to_rgba8();
    if !rgba.pixels().any(|p| p.0[3] > 0) {
        debug!("No visible pixels, passing through");
        return Ok(OutlineOutcome::PassThrough(SkipReason::NoVisibleContent));
    }

    let (width, height) = rgba.dimensions();
    let (canvas_w, canvas_h) = canvas_size(width, height, outline_size)?;

    let binary = OpacityMask::from_rgba(&rgba, BINARIZE_THRESHOLD).to_gray();
    let interior = erode_passes(&binary, edge_buffer);
    if !interior.pixels().any(|p| p.0[0] > 0) {
        // Only matting noise, or strokes thinner than the edge buffer.
        debug!(edge_buffer, "Nothing left after erosion, passing through");
        return Ok(OutlineOutcome::PassThrough(SkipReason::NoVisibleContent));
    }

    let mut placed_interior = GrayImage::new(canvas_w, canvas_h);
    imageops::replace(
        &mut placed_interior,
        &interior,
        outline_size as i64,
        outline_size as i64,
    );

    let (passes, remainder) = dilation_schedule(outline_size, edge_buffer);
    let mut outer = dilate_passes(&placed_interior, passes, DILATE_RADIUS);
    if remainder > 0 {
        outer = dilate_passes(&outer, 1, remainder);
    }

    let smooth = gaussian_blur(&outer, FIRST_BLUR_SIGMA);
    let smooth = three_way_threshold(&smooth, CLEAR_CUTOFF, SOLID_CUTOFF);
    let smooth = smooth_more(&gaussian_blur(&smooth, SECOND_BLUR_SIGMA));
    let band = force_interior(smooth, &placed_interior);

    let mut canvas = paint_band(&band);
    paste_artwork(&mut canvas, &rgba, &interior, outline_size);

    info!(
        outline_size,
        edge_buffer,
        dilation_passes = passes,
        remainder,
        canvas_w,
        canvas_h,
        "Outline synthesized"
    );
    Ok(OutlineOutcome::Outlined(canvas))
}

fn canvas_size(width: u32, height: u32, outline_size: u32) -> Result<(u32, u32)> {
    let margin = outline_size.checked_mul(2);
    let w = margin.and_then(|m| width.checked_add(m));
    let h = margin.and_then(|m| height.checked_add(m));
    match (w, h) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(Error::Processing(format!(
            "outline canvas overflows: {}x{} with outline {}",
            width, height, outline_size
        ))),
    }
}

/// White band whose opacity is the mask value; transparent elsewhere.
fn paint_band(band: &GrayImage) -> RgbaImage {
    let (w, h) = band.dimensions();
    RgbaImage::from_fn(w, h, |x, y| {
        let m = band.get_pixel(x, y).0[0];
        if m > 0 {
            Rgba([255, 255, 255, m])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Paste interior artwork pixels fully opaque, whitening translucent fringe.
fn paste_artwork(canvas: &mut RgbaImage, art: &RgbaImage, interior: &GrayImage, offset: u32) {
    for (x, y, src) in art.enumerate_pixels() {
        if interior.get_pixel(x, y).0[0] == 0 {
            continue;
        }
        let [r, g, b, a] = src.0;
        let pixel = if a > BINARIZE_THRESHOLD && a < FRINGE_OPAQUE {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([r, g, b, 255])
        };
        canvas.put_pixel(x + offset, y + offset, pixel);
    }
}
