//! Consolidated validation utilities
//!
//! Intake rules for images and range checks for numeric settings.

pub mod asset;
pub mod numeric;

pub use asset::{ImageValidator, IMAGE_MIME_PREFIX, MAX_UPLOAD_BYTES};
pub use numeric::NumericValidator;
