//! I/O layer: the raster `reader` for opacity-bearing inputs and the atomic
//! PNG `writers` for the two output artifacts.
pub mod reader;
pub use reader::{SUPPORTED_EXTENSIONS, is_supported_image, open_image};

pub mod writers;
