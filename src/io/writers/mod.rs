//! Output writers. Every artifact is written through a temporary file that is
//! renamed into place only after a complete encode.
pub mod png;

pub use png::write_png;
