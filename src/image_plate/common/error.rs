use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagePlateError {
    #[error("Malformed descriptor {file}: {reason}")]
    MalformedDescriptor { file: String, reason: String },

    #[error("Unsupported bit depth {bit_depth} in {file}")]
    UnsupportedBitDepth { file: String, bit_depth: u32 },

    #[error("Size mismatch in {file}: expected {expected} {unit}, found {actual}")]
    SizeMismatch {
        file: String,
        expected: usize,
        actual: usize,
        unit: &'static str,
    },

    #[error("Raw value {value} at index {index} in {file} exceeds the {max} ceiling")]
    ValueOutOfRange {
        file: String,
        index: usize,
        value: u32,
        max: u32,
    },

    #[error("Scan {other} has geometry {found}, expected {expected} as in {first}")]
    InconsistentScanGeometry {
        first: String,
        other: String,
        expected: String,
        found: String,
    },

    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    #[error("Scan set contains no scans")]
    EmptyScanSet,

    #[error("Missing companion file: {0}")]
    MissingCompanion(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ImagePlateError>;
