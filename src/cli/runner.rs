use std::fs;
use std::path::Path;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use stickercut::api::{
    BatchOptions, crop_directory_to_path, crop_file_to_dir, process_directory_to_path,
    process_file_to_dir,
};
use stickercut::PipelineParams;

use super::args::CliArgs;
use super::errors::AppError;

/// Parse `--size`: "original" disables scaling, otherwise a positive integer.
pub fn parse_size(size: &str) -> Result<Option<usize>, AppError> {
    if size.eq_ignore_ascii_case("original") {
        return Ok(None);
    }
    let parsed = size.trim().parse::<usize>().map_err(|_| AppError::InvalidSize {
        size: size.to_string(),
    })?;
    if parsed == 0 {
        return Err(AppError::ZeroSize { size: parsed });
    }
    Ok(Some(parsed))
}

/// Config file (or defaults) with command line overrides applied on top.
pub fn build_params(args: &CliArgs) -> Result<PipelineParams, AppError> {
    let mut params = match &args.config {
        Some(path) => PipelineParams::from_json_file(path)?,
        None => PipelineParams::default(),
    };

    if let Some(ratio) = args.target_ratio {
        params.target_ratio = ratio;
    }
    if let Some(padding) = args.safety_padding {
        params.safety_padding = padding;
    }
    if let Some(outline) = args.outline_size {
        params.outline_size = outline;
    }
    if let Some(buffer) = args.edge_buffer {
        params.edge_buffer = buffer;
    }
    if let Some(size) = &args.size {
        params.size = parse_size(size)?;
    }
    if let Some(compression) = args.compression {
        params.compression = compression;
    }

    params.validate()?;
    Ok(params)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_single(
    input: &Path,
    output_dir: &Path,
    params: &PipelineParams,
    crop_only: bool,
) -> Result<(), AppError> {
    fs::create_dir_all(output_dir)?;
    if crop_only {
        let (cropped, fallback) = crop_file_to_dir(input, output_dir, params)?;
        if fallback {
            warn!(input = %input.display(), "Nothing to crop, source saved unchanged");
        }
        info!("Successfully cropped: {:?} -> {:?}", input, cropped);
        return Ok(());
    }
    let paths = process_file_to_dir(input, output_dir, params)?;
    if paths.fallback {
        warn!(input = %input.display(), "A stage passed the source through unchanged");
    }
    info!(
        "Successfully processed: {:?} -> {:?}, {:?}",
        input, paths.cropped, paths.outlined
    );
    Ok(())
}

fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    params: &PipelineParams,
    args: &CliArgs,
) -> Result<(), AppError> {
    info!("Starting batch processing from directory: {:?}", input_dir);
    info!("Output directory: {:?}", output_dir);

    let options = BatchOptions {
        continue_on_error: args.continue_on_error,
        skip_existing: args.skip_existing,
        jobs: args.jobs,
    };
    let report = if args.crop_only {
        crop_directory_to_path(input_dir, output_dir, params, options)?
    } else {
        process_directory_to_path(input_dir, output_dir, params, options)?
    };

    info!("Batch processing complete!");
    info!("Processed: {}", report.processed);
    info!("Skipped: {}", report.skipped);
    info!("Errors: {}", report.errors);
    info!("Fallbacks: {}", report.fallbacks);
    for failure in &report.failures {
        warn!("Failed: {:?}: {}", failure.path, failure.message);
    }

    if let Some(report_path) = &args.report {
        report.write_json(report_path)?;
        info!("Report written to {:?}", report_path);
    }
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        init_logging();
    }

    let params = build_params(&args)?;
    let output_dir = args.output_dir.clone().ok_or(AppError::MissingArgument {
        arg: "--output-dir".to_string(),
    })?;

    match (&args.input, &args.input_dir) {
        (Some(_), Some(_)) => Err(AppError::ConflictingArguments {
            first: "--input",
            second: "--input-dir",
        }
        .into()),
        (Some(input), None) => Ok(run_single(input, &output_dir, &params, args.crop_only)?),
        (None, Some(input_dir)) => Ok(run_batch(input_dir, &output_dir, &params, &args)?),
        (None, None) => Err(AppError::MissingArgument {
            arg: "--input or --input-dir".to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use stickercut::PngCompression;

    #[test]
    fn size_accepts_original_and_positive_integers() {
        assert_eq!(parse_size("original").unwrap(), None);
        assert_eq!(parse_size("ORIGINAL").unwrap(), None);
        assert_eq!(parse_size("1024").unwrap(), Some(1024));
    }

    #[test]
    fn size_rejects_zero_and_garbage() {
        assert!(matches!(parse_size("0"), Err(AppError::ZeroSize { size: 0 })));
        assert!(matches!(parse_size("big"), Err(AppError::InvalidSize { .. })));
        assert!(matches!(parse_size("-5"), Err(AppError::InvalidSize { .. })));
    }

    #[test]
    fn flags_override_defaults() {
        let args = CliArgs::parse_from([
            "stickercut",
            "--input",
            "a.png",
            "--output-dir",
            "out",
            "--outline-size",
            "12",
            "--size",
            "512",
            "--compression",
            "best",
        ]);
        let params = build_params(&args).unwrap();
        assert_eq!(params.outline_size, 12);
        assert_eq!(params.size, Some(512));
        assert_eq!(params.compression, PngCompression::Best);
        assert_eq!(params.target_ratio, PipelineParams::default().target_ratio);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("params.json");
        fs::write(&config, r#"{"target_ratio": 0.8, "edge_buffer": 1}"#).unwrap();

        let args = CliArgs::parse_from([
            "stickercut",
            "--input-dir",
            "in",
            "--output-dir",
            "out",
            "--config",
            config.to_str().unwrap(),
            "--edge-buffer",
            "5",
        ]);
        let params = build_params(&args).unwrap();
        assert_eq!(params.target_ratio, 0.8);
        assert_eq!(params.edge_buffer, 5);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = CliArgs::parse_from([
            "stickercut",
            "--input",
            "a.png",
            "--output-dir",
            "out",
            "--target-ratio",
            "1.5",
        ]);
        assert!(matches!(build_params(&args), Err(AppError::Lib(_))));
    }

    #[test]
    fn batch_alias_sets_continue_on_error() {
        let args = CliArgs::parse_from(["stickercut", "--input-dir", "in", "-o", "out", "--batch"]);
        assert!(args.continue_on_error);
    }

    #[test]
    fn crop_only_batch_writes_no_outlines() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let img = image::RgbaImage::from_fn(40, 40, |x, y| {
            if (10..20).contains(&x) && (15..25).contains(&y) {
                image::Rgba([10, 200, 10, 255])
            } else {
                image::Rgba([0, 0, 0, 0])
            }
        });
        img.save(input.path().join("leaf.png")).unwrap();

        let args = CliArgs::parse_from([
            "stickercut",
            "--input-dir",
            input.path().to_str().unwrap(),
            "-o",
            output.path().to_str().unwrap(),
            "--crop-only",
        ]);
        assert!(args.crop_only);
        run(args).unwrap();

        assert!(output.path().join("leaf_cropped.png").is_file());
        assert!(!output.path().join("leaf_outlined_cropped.png").exists());
    }
}
