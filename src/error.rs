use std::path::PathBuf;
use thiserror::Error;

use crate::labels::{LabelError, LabelId};
use crate::model::ImageId;

/// The main error type for boxlabel operations.
#[derive(Debug, Error)]
pub enum BoxlabelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid annotation: {0}")]
    Validation(#[from] ValidationError),

    #[error("Label set error: {0}")]
    Label(#[from] LabelError),

    #[error("Invalid COCO document {path}: {message}")]
    CocoFormat { path: PathBuf, message: String },

    #[error("Failed to parse COCO JSON from {path}: {source}")]
    CocoJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write COCO JSON to {path}: {source}")]
    CocoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write CSV to {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse label file {path}: {source}")]
    LabelsCsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Nothing to export: {0}")]
    EmptyExport(EmptyExportReason),

    #[error("Unsupported image format: {path}")]
    UnsupportedImageFormat { path: PathBuf },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Unknown image {0}")]
    UnknownImage(ImageId),

    #[error("Label {0} is not in the label set")]
    UnknownLabel(LabelId),

    #[error("No image is currently selected")]
    NoCurrentImage,

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Why an annotation was rejected.
///
/// Returned by [`crate::store::validate`]; nothing is mutated when a
/// create fails with one of these.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("label id must be positive (got {0})")]
    NonPositiveLabelId(i64),

    #[error("label name cannot be empty")]
    BlankLabelName,

    #[error("bounding box is required")]
    MissingBox,

    #[error("bounding box must have positive width and height (got {width}x{height})")]
    NonPositiveSize { width: i32, height: i32 },
}

/// Why an export refused to write anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EmptyExportReason {
    #[error("no images to export")]
    NoImages,

    #[error("no annotations to export")]
    NoAnnotations,
}
