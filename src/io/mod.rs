//! Dataset file formats.
//!
//! - [`csv_export`]: flat CSV, one row per annotation (export only).
//! - [`coco_json`]: COCO JSON export and best-effort import.
//! - [`labels_csv`]: label set files.
//! - [`resolve`]: locating image files named by an imported dataset.
//! - [`report`]: structured diagnostics produced by import.

pub mod coco_json;
pub mod csv_export;
pub mod labels_csv;
pub mod report;
pub mod resolve;

pub use coco_json::{
    build_coco_document, from_coco_slice, from_coco_str, read_coco_json, to_coco_string,
    write_coco_json, CocoDocument, CocoImport, ImportOptions,
};
pub use csv_export::{to_csv_string, write_csv, CSV_HEADER};
pub use labels_csv::read_labels_csv;
pub use report::{ImportCounts, ImportIssue, ImportIssueCode, ImportReport, ImportSeverity};
pub use resolve::{resolve_image_file, ResolvedImage, ResolvedVia};
