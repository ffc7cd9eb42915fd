//! Locating image files named by an imported dataset.
//!
//! A COCO `file_name` is usually relative to wherever the dataset was
//! exported, which may not match where the images live now. Resolution
//! tries, in order:
//!
//! 1. `base/file_name` as written (keeps subdirectories such as
//!    `train/images/cat.jpg`),
//! 2. `base/<basename>`,
//! 3. the first file named `<basename>` in a recursive walk of `base`.
//!
//! The walk visits entries sorted by file name so that the same tree always
//! yields the same match.

use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

/// Which tier found the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedVia {
    RelativePath,
    Basename,
    Search,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Absolute path of the file found.
    pub path: PathBuf,
    pub via: ResolvedVia,
}

/// Finds the file for `file_name` under `base`, or `None` if no tier
/// matches.
pub fn resolve_image_file(base: &Path, file_name: &str) -> Option<ResolvedImage> {
    let direct = base.join(file_name);
    if direct.is_file() {
        return Some(resolved(direct, ResolvedVia::RelativePath));
    }

    let basename = Path::new(file_name).file_name()?;

    let flat = base.join(basename);
    if flat.is_file() {
        return Some(resolved(flat, ResolvedVia::Basename));
    }

    WalkDir::new(base)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .find(|entry| entry.file_type().is_file() && entry.file_name() == basename)
        .map(|entry| resolved(entry.into_path(), ResolvedVia::Search))
}

fn resolved(path: PathBuf, via: ResolvedVia) -> ResolvedImage {
    let path = std::path::absolute(&path).unwrap_or(path);
    ResolvedImage { path, via }
}
