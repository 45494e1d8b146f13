//! Common utilities module
//!
//! This module contains the error type shared by every stage of the image plate pipeline.

pub mod error;

pub use error::{ImagePlateError, Result};
