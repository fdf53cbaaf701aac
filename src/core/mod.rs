//! Core processing building blocks: crop planning, outline synthesis,
//! resize and save helpers. These are internal primitives consumed by the
//! high-level `api` module.
pub mod params;
pub mod processing;
