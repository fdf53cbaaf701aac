use clap::Parser;
use std::path::PathBuf;

use stickercut::PngCompression;

#[derive(Parser, Debug)]
#[command(name = "stickercut", version, about = "Square crops and white outlines for transparent cut-outs")]
pub struct CliArgs {
    /// Input image (single file mode)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Input directory containing cut-out images (batch mode)
    #[arg(long)]
    pub input_dir: Option<PathBuf>,

    /// Output directory for `<stem>_cropped.png` and `<stem>_outlined_cropped.png`
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// JSON file with pipeline parameters; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Fraction of the square frame the padded subject should fill, in (0, 1]
    #[arg(long)]
    pub target_ratio: Option<f64>,

    /// Fractional margin added around the subject before sizing the crop
    #[arg(long)]
    pub safety_padding: Option<f64>,

    /// Outline band thickness in pixels
    #[arg(long)]
    pub outline_size: Option<u32>,

    /// Erosion passes applied to the subject edge before outlining
    #[arg(long)]
    pub edge_buffer: Option<u32>,

    /// Long side of written artifacts. Options:
    /// - Custom: any positive integer (e.g., 1024)
    /// - Original: "original" (no scaling)
    #[arg(long)]
    pub size: Option<String>,

    /// PNG compression level
    #[arg(long, value_enum)]
    pub compression: Option<PngCompression>,

    /// Write only `<stem>_cropped.png`, skipping the outline stage
    #[arg(long, default_value_t = false)]
    pub crop_only: bool,

    /// Worker threads for batch mode
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Skip images whose two outputs already exist
    #[arg(long, default_value_t = false)]
    pub skip_existing: bool,

    /// Batch mode: keep processing other files when one fails
    #[arg(long, visible_alias = "batch", default_value_t = false)]
    pub continue_on_error: bool,

    /// Write the batch report as JSON to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Enable logging (level from RUST_LOG, default debug)
    #[arg(long, default_value_t = false)]
    pub log: bool,
}
