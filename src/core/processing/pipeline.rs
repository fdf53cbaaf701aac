use image::DynamicImage;
use tracing::{info, warn};

use crate::core::params::PipelineParams;
use crate::core::processing::crop::{CropWindow, crop_to_window, plan_crop};
use crate::core::processing::outline::synthesize_outline;
use crate::error::Result;
use crate::types::{CropPlan, OutlineOutcome, SkipReason};

/// The two artifacts for one source image, plus how each stage resolved.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Square crop, or the source when cropping was a no-op.
    pub cropped: DynamicImage,
    /// Outlined crop, or `cropped` unchanged when outlining passed through.
    pub outlined: DynamicImage,
    pub crop_window: Option<CropWindow>,
    pub crop_skipped: Option<SkipReason>,
    pub outline_skipped: Option<SkipReason>,
}

impl PipelineOutput {
    /// True when either stage fell back to passing its input through.
    pub fn is_fallback(&self) -> bool {
        self.crop_skipped.is_some() || self.outline_skipped.is_some()
    }
}

/// Crop around the subject, then outline the crop.
pub fn process_image(image: &DynamicImage, params: &PipelineParams) -> Result<PipelineOutput> {
    params.validate()?;

    let (cropped, crop_window, crop_skipped) =
        match plan_crop(image, params.target_ratio, params.safety_padding)? {
            CropPlan::Crop(window) => (crop_to_window(image, &window), Some(window), None),
            CropPlan::NoOp(reason) => {
                warn!(%reason, "Crop skipped, continuing with the source image");
                (image.clone(), None, Some(reason))
            }
        };

    let (outlined, outline_skipped) =
        match synthesize_outline(&cropped, params.outline_size, params.edge_buffer)? {
            OutlineOutcome::Outlined(canvas) => (DynamicImage::ImageRgba8(canvas), None),
            OutlineOutcome::PassThrough(reason) => {
                warn!(%reason, "Outline skipped, passing the crop through");
                (cropped.clone(), Some(reason))
            }
        };

    info!(
        cropped_w = cropped.width(),
        cropped_h = cropped.height(),
        outlined_w = outlined.width(),
        outlined_h = outlined.height(),
        "Pipeline complete"
    );

    Ok(PipelineOutput {
        cropped,
        outlined,
        crop_window,
        crop_skipped,
        outline_skipped,
    })
}

