//! Label set files: `label_id,label_name` CSV with a header row.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::BoxlabelError;
use crate::labels::{LabelId, LabelRegistry};

#[derive(Debug, Deserialize)]
struct LabelRow {
    label_id: i64,
    label_name: String,
}

/// Reads a label set file into a registry.
///
/// # Errors
/// I/O and CSV errors, and [`BoxlabelError::Label`] for the first row that
/// breaks a registry rule (duplicate id or name, blank name, id <= 0).
pub fn read_labels_csv(path: &Path) -> Result<LabelRegistry, BoxlabelError> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let mut pairs = Vec::new();
    for result in reader.deserialize() {
        let row: LabelRow = result.map_err(|source| BoxlabelError::LabelsCsvParse {
            path: path.to_path_buf(),
            source,
        })?;
        pairs.push((LabelId(row.label_id), row.label_name));
    }

    let registry = LabelRegistry::from_pairs(pairs)?;
    log::debug!("read {} label(s) from {}", registry.len(), path.display());
    Ok(registry)
}
