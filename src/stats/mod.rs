//! Summary statistics shown before and after an export.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::model::Image;

const BAR_WIDTH: usize = 20;

/// Counts over a set of images and their annotations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    pub total_images: usize,
    pub total_annotations: usize,
    pub images_with_annotations: usize,
    pub images_without_annotations: usize,
    /// Annotation count per label name.
    pub label_distribution: BTreeMap<String, usize>,
}

impl ExportStats {
    pub fn from_images(images: &[Image]) -> Self {
        let mut stats = Self {
            total_images: images.len(),
            ..Self::default()
        };

        for image in images {
            if image.annotations.is_empty() {
                stats.images_without_annotations += 1;
            } else {
                stats.images_with_annotations += 1;
            }

            for ann in &image.annotations {
                stats.total_annotations += 1;
                *stats
                    .label_distribution
                    .entry(ann.label_name.clone())
                    .or_default() += 1;
            }
        }

        stats
    }
}

impl fmt::Display for ExportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Images:        {:>8}", format_number(self.total_images))?;
        writeln!(
            f,
            "  Annotations:   {:>8}",
            format_number(self.total_annotations)
        )?;
        writeln!(
            f,
            "  Annotated:     {:>8} of {} ({})",
            format_number(self.images_with_annotations),
            format_number(self.total_images),
            fmt_percent(self.images_with_annotations, self.total_images)
        )?;

        if self.label_distribution.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "  Labels ({}):", self.label_distribution.len())?;

        let max_count = self.label_distribution.values().copied().max().unwrap_or(0);
        let name_width = self
            .label_distribution
            .keys()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0);

        for (name, count) in &self.label_distribution {
            writeln!(
                f,
                "    {:<name_width$}  {}  {:>6}",
                name,
                render_bar(*count, max_count, BAR_WIDTH),
                format_number(*count),
            )?;
        }

        Ok(())
    }
}

fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

fn fmt_percent(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", (numerator as f64 / denominator as f64) * 100.0)
    }
}

fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = ((count * width) / max_count).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}
