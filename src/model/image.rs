//! The image entity and its annotations.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::annotation::Annotation;
use super::ids::{AnnotationId, ImageId};

/// Raster formats the loader accepts, keyed by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Bmp,
    Gif,
}

impl ImageFormat {
    /// Extensions accepted for loading and directory scans (lowercase).
    pub const EXTENSIONS: [&'static str; 5] = ["jpg", "jpeg", "png", "bmp", "gif"];

    /// Infers the format from an extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Infers the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Bmp => "BMP",
            Self::Gif => "GIF",
        };
        f.write_str(name)
    }
}

/// An image on disk plus the annotations drawn on it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Image {
    id: ImageId,

    /// Absolute path of the file.
    pub file_path: PathBuf,

    /// Display name, or a `/`-separated path relative to the project base
    /// directory. This is what exports write as the image name.
    pub filename: String,

    pub width: u32,
    pub height: u32,

    /// Format inferred from the extension; `None` for imported entries
    /// whose extension is not one the loader knows.
    pub format: Option<ImageFormat>,

    /// Annotations in display order. The image owns them.
    pub annotations: Vec<Annotation>,
}

impl Image {
    /// Creates an image entry with a fresh id and no annotations.
    pub fn new(
        file_path: impl Into<PathBuf>,
        filename: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        let file_path = file_path.into();
        let format = ImageFormat::from_path(&file_path);
        Self {
            id: ImageId::generate(),
            file_path,
            filename: filename.into(),
            width,
            height,
            format,
            annotations: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> ImageId {
        self.id
    }

    /// Appends an annotation, re-pointing its back-reference at this image.
    pub fn add_annotation(&mut self, mut annotation: Annotation) {
        annotation.image_id = self.id;
        self.annotations.push(annotation);
    }

    /// Removes an annotation by id, returning it if it was present.
    pub fn remove_annotation(&mut self, id: AnnotationId) -> Option<Annotation> {
        let index = self.annotations.iter().position(|ann| ann.id() == id)?;
        Some(self.annotations.remove(index))
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.iter().find(|ann| ann.id() == id)
    }

    pub fn annotation_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.annotations.iter_mut().find(|ann| ann.id() == id)
    }
}
