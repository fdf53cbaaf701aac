//! Per-image processing stages: opacity masks, the square crop planner, the
//! morphological outline synthesizer, output resizing, and the pipeline that
//! chains them.
pub mod crop;
pub mod mask;
pub mod morphology;
pub mod outline;
pub mod pipeline;
pub mod resize;
pub mod save;
