//! TIFF export module
//!
//! Writes combined PSL images as single channel 32-bit floating point TIFF files.

mod writer;
mod standard_tiff_writer;

pub use writer::TiffWriter;
pub use standard_tiff_writer::StandardTiffWriter;
