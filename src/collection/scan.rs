//! Bulk loading from subdirectories of a base directory.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::ImageCollection;
use crate::error::BoxlabelError;
use crate::loader::ImageLoader;
use crate::model::ImageFormat;

/// A file (or directory) a bulk load had to skip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of [`ImageCollection::bulk_load`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BulkLoad {
    /// Number of images added to the collection.
    pub loaded: usize,
    /// Entries that failed to load; the batch continued past each of them.
    pub skipped: Vec<SkippedFile>,
}

impl ImageCollection {
    /// Loads every supported image directly inside each `base/subdir`.
    ///
    /// Files are matched by extension, ignoring case, and visited in file
    /// name order. Each image's `filename` is set to its path relative to
    /// `base_path` (with `/` separators) so that exports keep the directory
    /// structure. A file that fails to load is recorded and skipped; so is a
    /// subdirectory that cannot be read.
    ///
    /// # Errors
    /// Only if `base_path` itself cannot be made absolute.
    pub fn bulk_load<S: AsRef<Path>>(
        &mut self,
        base_path: &Path,
        subdirectories: &[S],
        loader: &dyn ImageLoader,
    ) -> Result<BulkLoad, BoxlabelError> {
        let base = std::path::absolute(base_path)?;
        self.set_base_path(&base);

        let mut outcome = BulkLoad::default();

        for subdir in subdirectories {
            let dir = base.join(subdir.as_ref());
            for entry in WalkDir::new(&dir)
                .min_depth(1)
                .max_depth(1)
                .follow_links(true)
                .sort_by_file_name()
            {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        let path = err
                            .path()
                            .map(Path::to_path_buf)
                            .unwrap_or_else(|| dir.clone());
                        log::warn!("Could not read {}: {}", path.display(), err);
                        outcome.skipped.push(SkippedFile {
                            path,
                            reason: err.to_string(),
                        });
                        continue;
                    }
                };

                let path = entry.path();
                if !entry.file_type().is_file() || ImageFormat::from_path(path).is_none() {
                    continue;
                }

                match loader.load(path) {
                    Ok(mut image) => {
                        image.filename = rel_string(&base, path);
                        self.add(path.to_path_buf(), image);
                        outcome.loaded += 1;
                    }
                    Err(err) => {
                        log::warn!("Could not load {}: {}", path.display(), err);
                        outcome.skipped.push(SkippedFile {
                            path: path.to_path_buf(),
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        log::info!(
            "Loaded {} image(s) from {} subdirector{} of {}",
            outcome.loaded,
            subdirectories.len(),
            if subdirectories.len() == 1 { "y" } else { "ies" },
            base.display()
        );
        Ok(outcome)
    }
}

pub(crate) fn rel_string(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}
