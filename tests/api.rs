use std::fs;
use std::path::Path;

use image::{DynamicImage, Rgba, RgbImage, RgbaImage};

use stickercut::{
    BatchOptions, PipelineParams, crop_directory_to_path, crop_file, iterate_images, outline_file,
    output_paths, process_directory_to_path, process_file_to_dir,
};

/// 80x80 transparent canvas with a 20x10 opaque block in the middle.
fn sample_cutout() -> RgbaImage {
    RgbaImage::from_fn(80, 80, |x, y| {
        if (30..50).contains(&x) && (35..45).contains(&y) {
            Rgba([120, 200, 60, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

fn write_sample(path: &Path, img: &RgbaImage) {
    img.save(path).unwrap();
}

#[test]
fn single_image_produces_both_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("frog.png");
    write_sample(&input, &sample_cutout());
    let out = dir.path().join("out");

    let paths = process_file_to_dir(&input, &out, &PipelineParams::default()).unwrap();

    assert_eq!(paths.cropped, out.join("frog_cropped.png"));
    assert_eq!(paths.outlined, out.join("frog_outlined_cropped.png"));
    assert!(!paths.fallback);

    // 20x10 subject, 15% padding, ratio 0.5 -> 23 / sqrt(0.5) = 32.5 -> 32
    let cropped = image::open(&paths.cropped).unwrap();
    assert_eq!((cropped.width(), cropped.height()), (32, 32));
    let outlined = image::open(&paths.outlined).unwrap();
    assert_eq!((outlined.width(), outlined.height()), (32 + 80, 32 + 80));
}

#[test]
fn size_downscales_written_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("frog.png");
    write_sample(&input, &sample_cutout());
    let params = PipelineParams {
        size: Some(56),
        ..PipelineParams::default()
    };

    let paths = process_file_to_dir(&input, dir.path(), &params).unwrap();

    // the crop is smaller than the target and keeps its size
    let cropped = image::open(&paths.cropped).unwrap();
    assert_eq!((cropped.width(), cropped.height()), (32, 32));
    let outlined = image::open(&paths.outlined).unwrap();
    assert_eq!((outlined.width(), outlined.height()), (56, 56));
}

#[test]
fn transparent_input_is_copied_by_both_file_stages() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.png");
    let blank = RgbaImage::from_pixel(24, 12, Rgba([10, 10, 10, 0]));
    write_sample(&input, &blank);

    let cropped = dir.path().join("empty_cropped.png");
    assert!(!crop_file(&input, &cropped, 0.5, 0.15));
    assert_eq!(image::open(&cropped).unwrap().to_rgba8(), blank);

    let outlined = dir.path().join("empty_outlined.png");
    assert!(!outline_file(&input, &outlined, 10, 2));
    assert_eq!(image::open(&outlined).unwrap().to_rgba8(), blank);
}

#[test]
fn file_stages_report_success() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("frog.png");
    write_sample(&input, &sample_cutout());

    let cropped = dir.path().join("frog_cropped.png");
    assert!(crop_file(&input, &cropped, 0.5, 0.15));
    let outlined = dir.path().join("frog_outlined_cropped.png");
    assert!(outline_file(&cropped, &outlined, 10, 2));

    let img = image::open(&outlined).unwrap();
    assert_eq!((img.width(), img.height()), (52, 52));
}

#[test]
fn file_stages_swallow_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.png");
    let out = dir.path().join("out.png");

    assert!(!crop_file(&missing, &out, 0.5, 0.15));
    assert!(!outline_file(&missing, &out, 10, 2));
    assert!(!out.exists());

    let input = dir.path().join("frog.png");
    write_sample(&input, &sample_cutout());
    assert!(!crop_file(&input, &out, 2.0, 0.15));
    assert!(!out.exists());
}

#[test]
fn rgb_input_falls_back_through_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.jpg");
    DynamicImage::ImageRgb8(RgbImage::from_pixel(40, 30, image::Rgb([90, 90, 90])))
        .save(&input)
        .unwrap();

    let paths = process_file_to_dir(&input, dir.path(), &PipelineParams::default()).unwrap();
    assert!(paths.fallback);
    let outlined = image::open(&paths.outlined).unwrap();
    assert_eq!((outlined.width(), outlined.height()), (40, 30));
}

#[test]
fn directory_listing_is_filtered_and_sorted() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.png", "a.PNG", "c.webp", "notes.txt"] {
        fs::write(dir.path().join(name), b"x").unwrap();
    }
    fs::create_dir(dir.path().join("nested.png")).unwrap();

    let names: Vec<String> = iterate_images(dir.path())
        .unwrap()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["a.PNG", "b.png", "c.webp"]);
}

#[test]
fn batch_counts_processed_failed_and_fallbacks() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    fs::create_dir(&input_dir).unwrap();

    write_sample(&input_dir.join("one.png"), &sample_cutout());
    write_sample(&input_dir.join("two.png"), &sample_cutout());
    write_sample(&input_dir.join("blank.png"), &RgbaImage::new(8, 8));
    fs::write(input_dir.join("broken.png"), b"not a png").unwrap();

    let options = BatchOptions {
        continue_on_error: true,
        skip_existing: false,
        jobs: Some(2),
    };
    let report =
        process_directory_to_path(&input_dir, &output_dir, &PipelineParams::default(), options)
            .unwrap();

    assert_eq!(report.processed, 3);
    assert_eq!(report.errors, 1);
    assert_eq!(report.fallbacks, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("broken.png"));
    assert!(report.finished_at >= report.started_at);

    let (cropped, outlined) = output_paths(&input_dir.join("one.png"), &output_dir);
    assert!(cropped.is_file() && outlined.is_file());

    let json_path = dir.path().join("report.json");
    report.write_json(&json_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["processed"], 3);
    assert_eq!(json["errors"], 1);
}

#[test]
fn batch_stops_on_first_error_without_continue() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    fs::create_dir(&input_dir).unwrap();
    fs::write(input_dir.join("broken.png"), b"not a png").unwrap();

    let result = process_directory_to_path(
        &input_dir,
        &dir.path().join("out"),
        &PipelineParams::default(),
        BatchOptions::default(),
    );
    assert!(result.is_err());
}

#[test]
fn batch_skips_images_with_existing_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    fs::create_dir(&input_dir).unwrap();
    write_sample(&input_dir.join("one.png"), &sample_cutout());
    write_sample(&input_dir.join("two.png"), &sample_cutout());

    let options = BatchOptions {
        skip_existing: true,
        ..BatchOptions::default()
    };
    let first =
        process_directory_to_path(&input_dir, &output_dir, &PipelineParams::default(), options)
            .unwrap();
    assert_eq!((first.processed, first.skipped), (2, 0));

    fs::remove_file(output_dir.join("two_outlined_cropped.png")).unwrap();
    let second =
        process_directory_to_path(&input_dir, &output_dir, &PipelineParams::default(), options)
            .unwrap();
    assert_eq!((second.processed, second.skipped), (1, 1));
}

#[test]
fn faint_matting_noise_falls_back_through_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("haze.png");
    write_sample(&input, &RgbaImage::from_pixel(64, 64, Rgba([90, 90, 90, 10])));

    let paths = process_file_to_dir(&input, dir.path(), &PipelineParams::default()).unwrap();
    assert!(paths.fallback);
    let outlined = image::open(&paths.outlined).unwrap();
    assert_eq!((outlined.width(), outlined.height()), (64, 64));
}

#[test]
fn crop_only_directory_writes_just_crops() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    fs::create_dir(&input_dir).unwrap();

    write_sample(&input_dir.join("one.png"), &sample_cutout());
    write_sample(&input_dir.join("blank.png"), &RgbaImage::new(8, 8));
    fs::write(input_dir.join("broken.png"), b"not a png").unwrap();

    let options = BatchOptions {
        continue_on_error: true,
        skip_existing: true,
        jobs: Some(2),
    };
    let params = PipelineParams::default();
    let report = crop_directory_to_path(&input_dir, &output_dir, &params, options).unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.fallbacks, 1);
    assert_eq!(report.errors, 1);

    let (cropped, outlined) = output_paths(&input_dir.join("one.png"), &output_dir);
    let crop = image::open(&cropped).unwrap();
    assert_eq!((crop.width(), crop.height()), (32, 32));
    assert!(!outlined.exists());
    assert!(output_dir.join("blank_cropped.png").is_file());

    let again = crop_directory_to_path(&input_dir, &output_dir, &params, options).unwrap();
    assert_eq!((again.processed, again.skipped, again.errors), (0, 2, 1));
}
