//! RAW pixel payload (`.img`) reading module
//!
//! Decodes the scanner's binary pixel array into a [`RawGrid`] checked against the
//! calibration record declared by the descriptor.

mod reader;
mod img_reader;
pub mod types;

pub use reader::RawImageReader;
pub use img_reader::ImgReader;
pub use types::RawGrid;
