//! Descriptor (`.inf`) parsing module
//!
//! Turns the scanner's textual metadata into a [`CalibrationRecord`].

mod parser;
mod inf_parser;
pub mod types;

pub use parser::DescriptorParser;
pub use inf_parser::InfParser;
pub use types::CalibrationRecord;
