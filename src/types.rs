//! Shared types and enums used across stickercut.
//! Includes `PngCompression`, the soft-skip `SkipReason`, and the stage
//! outcomes `CropPlan` / `OutlineOutcome`.
use clap::ValueEnum;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::core::processing::crop::CropWindow;

/// Lossless PNG compression effort used when writing artifacts.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    Fast,
    #[default]
    Default,
    Best,
}

impl std::fmt::Display for PngCompression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PngCompression::Fast => "fast",
            PngCompression::Default => "default",
            PngCompression::Best => "best",
        };
        write!(f, "{}", s)
    }
}

impl From<PngCompression> for image::codecs::png::CompressionType {
    fn from(value: PngCompression) -> Self {
        match value {
            PngCompression::Fast => image::codecs::png::CompressionType::Fast,
            PngCompression::Default => image::codecs::png::CompressionType::Default,
            PngCompression::Best => image::codecs::png::CompressionType::Best,
        }
    }
}

/// Why a stage passed its input through unchanged.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SkipReason {
    /// Every pixel is fully transparent.
    NoVisibleContent,
    /// The source has no opacity channel at all.
    MissingOpacityChannel,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoVisibleContent => write!(f, "no visible content"),
            SkipReason::MissingOpacityChannel => write!(f, "missing opacity channel"),
        }
    }
}

/// Result of planning a square crop.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CropPlan {
    Crop(CropWindow),
    NoOp(SkipReason),
}

impl CropPlan {
    pub fn window(&self) -> Option<CropWindow> {
        match self {
            CropPlan::Crop(w) => Some(*w),
            CropPlan::NoOp(_) => None,
        }
    }
}

/// Result of outline synthesis.
#[derive(Clone, Debug)]
pub enum OutlineOutcome {
    Outlined(RgbaImage),
    PassThrough(SkipReason),
}

impl OutlineOutcome {
    pub fn is_outlined(&self) -> bool {
        matches!(self, OutlineOutcome::Outlined(_))
    }
}
