use std::fs;
use std::io::BufWriter;
use std::path::Path;

use image::DynamicImage;
use image::codecs::png::{FilterType, PngEncoder};
use tempfile::Builder;

use crate::error::Result;
use crate::types::PngCompression;

/// Encode `image` as PNG at `output`.
///
/// The data goes to a temporary file beside `output` that is renamed over it
/// once encoding succeeds; on any error the temporary file is removed and
/// `output` is left untouched.
pub fn write_png(output: &Path, image: &DynamicImage, compression: PngCompression) -> Result<()> {
    let parent = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let tmp = Builder::new()
        .prefix(".stickercut-")
        .suffix(".png.part")
        .tempfile_in(parent)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        let encoder =
            PngEncoder::new_with_quality(&mut writer, compression.into(), FilterType::Adaptive);
        image.write_with_encoder(encoder)?;
        std::io::Write::flush(&mut writer)?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(output)?;
    Ok(())
}
