#![doc = r#"
stickercut: square subject crops and smooth white outlines for transparent cut-outs.

This crate turns opacity-bearing cut-out images (for example the output of a
background-removal model) into two catalog artifacts per image: a square crop
centered on the visible subject, and the same crop surrounded by a rounded,
gap-free white outline band. It powers the `stickercut` CLI and can be embedded
in your own Rust applications.

Add dependency
--------------
```toml
[dependencies]
stickercut = "0.1"
```

Quick start: one image into a directory
---------------------------------------
```rust,no_run
use std::path::Path;
use stickercut::{process_file_to_dir, PipelineParams, PngCompression};

fn main() -> stickercut::Result<()> {
    let params = PipelineParams {
        target_ratio: 0.5,
        safety_padding: 0.15,
        outline_size: 40,
        edge_buffer: 3,
        size: Some(1024),
        compression: PngCompression::Best,
    };

    let paths = process_file_to_dir(
        Path::new("/data/cutouts/andrew.png"),
        Path::new("/out"),
        &params,
    )?;
    println!("{} {}", paths.cropped.display(), paths.outlined.display());
    Ok(())
}
```

In-memory stages
----------------
```rust,no_run
use stickercut::{plan_crop, synthesize_outline, crop_to_window, CropPlan, OutlineOutcome};

fn main() -> stickercut::Result<()> {
    let image = image::open("/data/cutouts/andrew.png")?;

    let cropped = match plan_crop(&image, 0.5, 0.15)? {
        CropPlan::Crop(window) => crop_to_window(&image, &window),
        CropPlan::NoOp(reason) => {
            eprintln!("nothing to crop: {reason}");
            image.clone()
        }
    };

    if let OutlineOutcome::Outlined(canvas) = synthesize_outline(&cropped, 40, 3)? {
        canvas.save("/out/andrew_outlined.png")?;
    }
    Ok(())
}
```

Batch helpers
-------------
```rust,no_run
use std::path::Path;
use stickercut::{process_directory_to_path, BatchOptions, PipelineParams};

fn main() -> stickercut::Result<()> {
    let options = BatchOptions {
        continue_on_error: true,
        skip_existing: true,
        jobs: Some(4),
    };

    let report = process_directory_to_path(
        Path::new("/data/cutouts"),
        Path::new("/out"),
        &PipelineParams::default(),
        options,
    )?;

    println!("processed={} skipped={} errors={}", report.processed, report.skipped, report.errors);
    Ok(())
}
```

Error handling
--------------
All fallible public functions return `stickercut::Result<T>`; match on
`stickercut::Error` to handle specific cases. Images with nothing to crop or
outline are not errors: they come back as `CropPlan::NoOp` or
`OutlineOutcome::PassThrough`.

```rust,no_run
use std::path::Path;
use stickercut::{process_file_to_dir, Error, PipelineParams};

fn main() {
    let params = PipelineParams::default();
    match process_file_to_dir(Path::new("/bad/input.png"), Path::new("/out"), &params) {
        Ok(_) => {}
        Err(Error::Image(e)) => eprintln!("decode error: {e}"),
        Err(Error::InvalidArgument { arg, value }) => eprintln!("bad {arg}: {value}"),
        Err(other) => eprintln!("Other error: {other}"),
    }
}
```

Useful modules
--------------
- [`api`]: high-level, ergonomic entry points.
- [`core`]: parameters and the crop/outline processing stages.
- [`types`]: outcome enums and shared types (e.g. `CropPlan`, `SkipReason`).
- [`io`]: image reading and atomic PNG writing.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::params::PipelineParams;
pub use crate::core::processing::crop::{CropWindow, crop_to_window, plan_crop, required_side};
pub use crate::core::processing::mask::{BoundingBox, OpacityMask};
pub use crate::core::processing::outline::synthesize_outline;
pub use crate::core::processing::pipeline::{PipelineOutput, process_image};
pub use error::{Error, Result};
pub use types::{CropPlan, OutlineOutcome, PngCompression, SkipReason};

// High-level API re-exports
pub use api::{
    BatchFailure, BatchOptions, BatchReport, ProcessedPaths, crop_directory_to_path, crop_file,
    crop_file_to_dir, iterate_images, outline_file, output_paths, process_directory_to_path,
    process_file_to_dir,
};
