//! Image plate processing module
//!
//! Reads scanner `.inf`/`.img` pairs, calibrates raw counts to PSL and merges repeated
//! readouts of one plate into a single high dynamic range image.

pub mod common;
pub mod format;
pub mod descriptor;
pub mod raw;
pub mod psl;
pub mod scan_set;
pub mod combine;
pub mod config;
pub mod tiff;
pub mod conversions;

pub use common::{
    ImagePlateError,
    Result,
};

pub use format::{
    ByteOrder,
    DescriptorLayout,
    ScannerFormat,
    ScannerFormatBuilder,
};

pub use descriptor::{
    CalibrationRecord,
    DescriptorParser,
    InfParser,
};

pub use raw::{
    ImgReader,
    RawGrid,
    RawImageReader,
};

pub use psl::{
    PslConverter,
    PslGrid,
};

pub use scan_set::{
    Scan,
    ScanSet,
};

pub use combine::{
    CombineSummary,
    CombinedImage,
    MultiScanCombiner,
    ReadoutRatio,
    readout_ratios,
};

pub use config::{
    PlateConfig,
    PlateConfigBuilder,
    TiffCompression,
};

pub use tiff::{
    StandardTiffWriter,
    TiffWriter,
};

pub use conversions::{
    ImagePlatePipeline,
    ScanBuffers,
    scan_stems,
};
