use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::PngCompression;

pub const DEFAULT_TARGET_RATIO: f64 = 0.5;
pub const DEFAULT_SAFETY_PADDING: f64 = 0.15;
pub const DEFAULT_OUTLINE_SIZE: u32 = 40;
pub const DEFAULT_EDGE_BUFFER: u32 = 3;

/// Pipeline parameters suitable for config files and CLI presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// Fraction of the output frame's area occupied by the padded subject, in (0, 1]
    pub target_ratio: f64,
    /// Fractional margin added around the subject before sizing the crop
    pub safety_padding: f64,
    /// Outward thickness of the white band in pixels
    pub outline_size: u32,
    /// Erosion passes applied to the subject boundary before outlining
    pub edge_buffer: u32,
    /// Target long side in pixels for written artifacts; None means original size
    pub size: Option<usize>,
    pub compression: PngCompression,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            target_ratio: DEFAULT_TARGET_RATIO,
            safety_padding: DEFAULT_SAFETY_PADDING,
            outline_size: DEFAULT_OUTLINE_SIZE,
            edge_buffer: DEFAULT_EDGE_BUFFER,
            size: None,
            compression: PngCompression::Default,
        }
    }
}

impl PipelineParams {
    /// Load parameters from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let params: PipelineParams = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), ?params, "Loaded pipeline params");
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        validate_crop_params(self.target_ratio, self.safety_padding)?;
        if let Some(size) = self.size {
            if size == 0 {
                return Err(Error::ZeroSize { size });
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_crop_params(target_ratio: f64, safety_padding: f64) -> Result<()> {
    if !(target_ratio > 0.0 && target_ratio <= 1.0) {
        return Err(Error::InvalidArgument {
            arg: "target_ratio",
            value: target_ratio.to_string(),
        });
    }
    if !(safety_padding >= 0.0 && safety_padding.is_finite()) {
        return Err(Error::InvalidArgument {
            arg: "safety_padding",
            value: safety_padding.to_string(),
        });
    }
    Ok(())
}
