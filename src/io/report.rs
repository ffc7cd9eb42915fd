//! Structured diagnostics collected while importing a COCO dataset.
//!
//! Import is best-effort: images that cannot be found on disk and
//! annotations that point nowhere do not abort the import. Each such
//! decision is recorded here so callers can show or serialize it.

use serde::Serialize;
use std::fmt;

/// Outcome summary and issues of one import.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ImportReport {
    /// Counts as declared by the source document.
    pub input: ImportCounts,
    /// Counts that made it into the returned images.
    pub output: ImportCounts,
    /// How each kept image file was located.
    pub resolutions: ResolutionCounts,
    pub issues: Vec<ImportIssue>,
}

impl ImportReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: ImportIssue) {
        self.issues.push(issue);
    }

    pub fn warning_count(&self) -> usize {
        self.count(ImportSeverity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(ImportSeverity::Info)
    }

    fn count(&self, severity: ImportSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }

    /// True if anything from the source document was left out.
    pub fn is_lossy(&self) -> bool {
        self.warning_count() > 0
    }

    /// Issues with the given code, in the order they were recorded.
    pub fn issues_with_code(&self, code: ImportIssueCode) -> impl Iterator<Item = &ImportIssue> {
        self.issues.iter().filter(move |i| i.code == code)
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {} images, {} categories, {} annotations",
            self.input.images, self.input.categories, self.input.annotations
        )?;

        if self.output != self.input {
            writeln!(
                f,
                "  imported: {} images, {} categories, {} annotations",
                self.output.images, self.output.categories, self.output.annotations
            )?;
        }

        let r = &self.resolutions;
        if r.by_relative_path + r.by_basename + r.by_search > 0 {
            writeln!(
                f,
                "  located: {} by path, {} by file name, {} by search",
                r.by_relative_path, r.by_basename, r.by_search
            )?;
        }

        for (label, severity) in [
            ("Warnings", ImportSeverity::Warning),
            ("Notes", ImportSeverity::Info),
        ] {
            let count = self.count(severity);
            if count == 0 {
                continue;
            }
            writeln!(f)?;
            writeln!(f, "{} ({}):", label, count)?;
            for issue in self.issues.iter().filter(|i| i.severity == severity) {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportCounts {
    pub images: usize,
    pub categories: usize,
    pub annotations: usize,
}

/// Number of images located by each resolution tier.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionCounts {
    pub by_relative_path: usize,
    pub by_basename: usize,
    pub by_search: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportIssue {
    pub severity: ImportSeverity,
    pub code: ImportIssueCode,
    pub message: String,
}

impl ImportIssue {
    /// Something from the source was dropped.
    pub fn warning(code: ImportIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ImportSeverity::Warning,
            code,
            message: message.into(),
        }
    }

    /// A substitution or note; nothing was lost.
    pub fn info(code: ImportIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ImportSeverity::Info,
            code,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportSeverity {
    Warning,
    Info,
}

/// Stable issue codes. Serialized in `--output json` reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportIssueCode {
    /// The image file was not found by any resolution tier.
    ImageNotFound,
    /// An annotation references an image id absent from `images`.
    AnnotationImageMissing,
    /// An annotation belongs to an image that was dropped.
    AnnotationImageDropped,
    /// An annotation references a category id absent from `categories`;
    /// a placeholder label name was used.
    UnknownCategory,
    /// Two categories share an id; the first name was kept.
    DuplicateCategory,
    /// Two images share an id; each received that id's annotations.
    DuplicateImageId,
}
