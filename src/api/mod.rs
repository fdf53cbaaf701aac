//! High-level, ergonomic library API: process one image to its two artifacts,
//! batch helpers for directories, and the soft-failure file boundaries for the
//! crop and outline stages. Prefer these entrypoints over the low-level
//! processing modules when integrating stickercut.
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use image::DynamicImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::core::params::PipelineParams;
use crate::core::processing::crop::{crop_to_window, plan_crop};
use crate::core::processing::outline::synthesize_outline;
use crate::core::processing::pipeline::process_image;
use crate::core::processing::save::save_artifact;
use crate::error::{Error, Result};
use crate::io::reader::{is_supported_image, open_image};
use crate::io::writers::write_png;
use crate::types::{CropPlan, OutlineOutcome, PngCompression};

pub const CROPPED_SUFFIX: &str = "_cropped.png";
pub const OUTLINED_SUFFIX: &str = "_outlined_cropped.png";

/// Output file names for `input` inside `output_dir`.
pub fn output_paths(input: &Path, output_dir: &Path) -> (PathBuf, PathBuf) {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    (
        output_dir.join(format!("{}{}", stem, CROPPED_SUFFIX)),
        output_dir.join(format!("{}{}", stem, OUTLINED_SUFFIX)),
    )
}

/// Where the two artifacts of one image were written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedPaths {
    pub cropped: PathBuf,
    pub outlined: PathBuf,
    /// At least one stage passed its input through unchanged
    pub fallback: bool,
}

/// Load `input`, run crop + outline, and write `{stem}_cropped.png` and
/// `{stem}_outlined_cropped.png` into `output_dir`.
pub fn process_file_to_dir(
    input: &Path,
    output_dir: &Path,
    params: &PipelineParams,
) -> Result<ProcessedPaths> {
    let image = open_image(input)?;
    let output = process_image(&image, params)?;
    let (cropped_path, outlined_path) = output_paths(input, output_dir);

    save_artifact(&output.cropped, &cropped_path, params.size, params.compression)?;
    save_artifact(&output.outlined, &outlined_path, params.size, params.compression)?;

    Ok(ProcessedPaths {
        cropped: cropped_path,
        outlined: outlined_path,
        fallback: output.is_fallback(),
    })
}

fn crop_to_path(
    input: &Path,
    output: &Path,
    target_ratio: f64,
    safety_padding: f64,
    size: Option<usize>,
    compression: PngCompression,
) -> Result<bool> {
    let image = open_image(input)?;
    match plan_crop(&image, target_ratio, safety_padding)? {
        CropPlan::Crop(window) => {
            save_artifact(&crop_to_window(&image, &window), output, size, compression)?;
            Ok(true)
        }
        CropPlan::NoOp(reason) => {
            warn!(input = %input.display(), %reason, "Crop skipped, saving source unchanged");
            save_artifact(&image, output, size, compression)?;
            Ok(false)
        }
    }
}

/// Crop `input` around its subject into `output`.
///
/// Returns `true` when a crop was written. When there is nothing to crop
/// around, the source is written unchanged and `false` is returned; any
/// error is logged and also returns `false`.
pub fn crop_file(input: &Path, output: &Path, target_ratio: f64, safety_padding: f64) -> bool {
    match crop_to_path(input, output, target_ratio, safety_padding, None, PngCompression::Default) {
        Ok(cropped) => cropped,
        Err(e) => {
            error!(input = %input.display(), "Crop failed: {}", e);
            false
        }
    }
}

/// Crop only: write `{stem}_cropped.png` for `input` into `output_dir`,
/// honoring the size and compression in `params`.
///
/// Returns the written path and whether the source was passed through
/// uncropped.
pub fn crop_file_to_dir(
    input: &Path,
    output_dir: &Path,
    params: &PipelineParams,
) -> Result<(PathBuf, bool)> {
    let (cropped_path, _) = output_paths(input, output_dir);
    let cropped = crop_to_path(
        input,
        &cropped_path,
        params.target_ratio,
        params.safety_padding,
        params.size,
        params.compression,
    )?;
    Ok((cropped_path, !cropped))
}

/// Outline `input` into `output`.
///
/// Returns `true` when an outline was written. Images without an opacity
/// channel or visible pixels are written unchanged and return `false`; any
/// error is logged and also returns `false`.
pub fn outline_file(input: &Path, output: &Path, outline_size: u32, edge_buffer: u32) -> bool {
    let run = || -> Result<bool> {
        let image = open_image(input)?;
        match synthesize_outline(&image, outline_size, edge_buffer)? {
            OutlineOutcome::Outlined(canvas) => {
                write_png(output, &DynamicImage::ImageRgba8(canvas), PngCompression::Default)?;
                Ok(true)
            }
            OutlineOutcome::PassThrough(reason) => {
                warn!(input = %input.display(), %reason, "Outline skipped, saving source unchanged");
                write_png(output, &image, PngCompression::Default)?;
                Ok(false)
            }
        }
    };
    match run() {
        Ok(outlined) => outlined,
        Err(e) => {
            error!(input = %input.display(), "Outline failed: {}", e);
            false
        }
    }
}

/// Batch behavior switches
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Log failures in the report and keep going instead of returning the first error
    pub continue_on_error: bool,
    /// Skip images whose two outputs already exist
    pub skip_existing: bool,
    /// Worker threads; None uses the rayon default
    pub jobs: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Batch processing report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Processed images where a stage passed its input through
    pub fallbacks: usize,
    pub failures: Vec<BatchFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchReport {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            processed: 0,
            skipped: 0,
            errors: 0,
            fallbacks: 0,
            failures: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Return an iterator over supported image files directly inside `input_dir`, sorted by path
pub fn iterate_images(input_dir: &Path) -> Result<std::vec::IntoIter<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_dir).map_err(Error::from)? {
        let entry = entry.map_err(Error::from)?;
        let path = entry.path();
        if path.is_file() && is_supported_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files.into_iter())
}

enum ImageOutcome {
    Processed { fallback: bool },
    Skipped,
    Failed(BatchFailure),
}

fn run_one(path: &Path, output_dir: &Path, params: &PipelineParams, skip_existing: bool) -> Result<ImageOutcome> {
    if skip_existing {
        let (cropped, outlined) = output_paths(path, output_dir);
        if cropped.is_file() && outlined.is_file() {
            info!(input = %path.display(), "Outputs exist, skipping");
            return Ok(ImageOutcome::Skipped);
        }
    }
    info!(input = %path.display(), "Processing");
    let paths = process_file_to_dir(path, output_dir, params)?;
    info!(
        cropped = %paths.cropped.display(),
        outlined = %paths.outlined.display(),
        "Successfully processed"
    );
    Ok(ImageOutcome::Processed { fallback: paths.fallback })
}

fn crop_one(path: &Path, output_dir: &Path, params: &PipelineParams, skip_existing: bool) -> Result<ImageOutcome> {
    if skip_existing {
        let (cropped, _) = output_paths(path, output_dir);
        if cropped.is_file() {
            info!(input = %path.display(), "Crop exists, skipping");
            return Ok(ImageOutcome::Skipped);
        }
    }
    info!(input = %path.display(), "Cropping");
    let (cropped, fallback) = crop_file_to_dir(path, output_dir, params)?;
    info!(cropped = %cropped.display(), "Successfully cropped");
    Ok(ImageOutcome::Processed { fallback })
}

/// Run `work` over every supported image of `input_dir` on a rayon pool and
/// tally the outcomes.
fn run_directory<F>(
    input_dir: &Path,
    output_dir: &Path,
    params: &PipelineParams,
    options: BatchOptions,
    work: F,
) -> Result<BatchReport>
where
    F: Fn(&Path, &Path, &PipelineParams, bool) -> Result<ImageOutcome> + Sync,
{
    params.validate()?;
    std::fs::create_dir_all(output_dir).map_err(Error::from)?;

    let mut report = BatchReport::new();
    let inputs: Vec<PathBuf> = iterate_images(input_dir)?.collect();
    info!(count = inputs.len(), input_dir = %input_dir.display(), "Starting batch");

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = options.jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder.build().map_err(Error::external)?;

    let outcomes: Vec<ImageOutcome> = pool.install(|| {
        if options.continue_on_error {
            Ok(inputs
                .par_iter()
                .map(|path| {
                    work(path, output_dir, params, options.skip_existing).unwrap_or_else(|e| {
                        error!(input = %path.display(), "Error processing: {}", e);
                        ImageOutcome::Failed(BatchFailure {
                            path: path.clone(),
                            message: e.to_string(),
                        })
                    })
                })
                .collect())
        } else {
            inputs
                .par_iter()
                .map(|path| work(path, output_dir, params, options.skip_existing))
                .collect::<Result<Vec<_>>>()
        }
    })?;

    for outcome in outcomes {
        match outcome {
            ImageOutcome::Processed { fallback } => {
                report.processed += 1;
                if fallback {
                    report.fallbacks += 1;
                }
            }
            ImageOutcome::Skipped => report.skipped += 1,
            ImageOutcome::Failed(failure) => {
                report.errors += 1;
                report.failures.push(failure);
            }
        }
    }
    report.finished_at = Utc::now();

    info!(
        processed = report.processed,
        skipped = report.skipped,
        errors = report.errors,
        fallbacks = report.fallbacks,
        "Batch processing complete"
    );
    Ok(report)
}

/// Process all supported images from `input_dir` into `output_dir` using `params`.
///
/// Images run in parallel, one crop + outline pair per image. If
/// `options.continue_on_error` is true, errors are recorded in the report and
/// processing continues; otherwise the first error is returned.
pub fn process_directory_to_path(
    input_dir: &Path,
    output_dir: &Path,
    params: &PipelineParams,
    options: BatchOptions,
) -> Result<BatchReport> {
    run_directory(input_dir, output_dir, params, options, run_one)
}

/// Crop every supported image of `input_dir` into `output_dir`, writing only
/// `{stem}_cropped.png`. The outline parameters in `params` are unused.
///
/// Error handling matches [`process_directory_to_path`]. With
/// `options.skip_existing`, an image is skipped once its crop exists.
pub fn crop_directory_to_path(
    input_dir: &Path,
    output_dir: &Path,
    params: &PipelineParams,
    options: BatchOptions,
) -> Result<BatchReport> {
    run_directory(input_dir, output_dir, params, options, crop_one)
}
