//! Pipeline conversions module
//!
//! Orchestration from scanner file pairs on disk to an exported PSL image.

mod files;
mod plate_to_tiff;


pub use files::{companion_paths, scan_stems};
pub use plate_to_tiff::{ImagePlatePipeline, ScanBuffers};
