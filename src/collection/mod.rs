//! Ordered image collection with a navigation cursor.
//!
//! The collection owns every loaded [`Image`] (and through them every
//! annotation). A cursor marks the "current" image that drawing and
//! editing apply to.

mod scan;

pub use scan::{BulkLoad, SkippedFile};

use std::path::{Path, PathBuf};

use crate::model::{Image, ImageId};

/// Position of the navigation cursor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Cursor {
    /// No image selected (the collection is empty).
    #[default]
    None,
    /// Index into the collection.
    At(usize),
}

impl Cursor {
    pub fn index(&self) -> Option<usize> {
        match self {
            Cursor::None => None,
            Cursor::At(index) => Some(*index),
        }
    }
}

/// Images in navigation order plus the cursor.
#[derive(Clone, Debug, Default)]
pub struct ImageCollection {
    images: Vec<Image>,
    cursor: Cursor,
    base_path: Option<PathBuf>,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an image and returns its id.
    ///
    /// `metadata.file_path` is overwritten with `path`. The first image added
    /// to an empty collection becomes current.
    pub fn add(&mut self, path: impl Into<PathBuf>, mut metadata: Image) -> ImageId {
        metadata.file_path = path.into();
        let id = metadata.id();
        self.images.push(metadata);

        if self.cursor == Cursor::None {
            self.cursor = Cursor::At(0);
        }
        id
    }

    /// Removes an image (and with it all of its annotations).
    ///
    /// The cursor is clamped to the new last index, or cleared when the
    /// collection becomes empty. Returns the removed image so callers can
    /// clean up indexes that referenced its annotations.
    pub fn remove(&mut self, id: ImageId) -> Option<Image> {
        let index = self.position(id)?;
        let removed = self.images.remove(index);

        self.cursor = match self.cursor {
            _ if self.images.is_empty() => Cursor::None,
            Cursor::At(current) => Cursor::At(current.min(self.images.len() - 1)),
            Cursor::None => Cursor::None,
        };

        log::debug!("removed image {} ({})", removed.filename, id);
        Some(removed)
    }

    /// Moves to the next image, stopping at the last one.
    pub fn next(&mut self) -> Option<&Image> {
        if let Cursor::At(current) = self.cursor {
            if current + 1 < self.images.len() {
                self.cursor = Cursor::At(current + 1);
            }
        }
        self.current()
    }

    /// Moves to the previous image, stopping at the first one.
    pub fn previous(&mut self) -> Option<&Image> {
        if let Cursor::At(current) = self.cursor {
            self.cursor = Cursor::At(current.saturating_sub(1));
        }
        self.current()
    }

    /// Jumps to the image with the given id. Returns false if absent.
    pub fn goto(&mut self, id: ImageId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.cursor = Cursor::At(index);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&Image> {
        self.cursor.index().and_then(|index| self.images.get(index))
    }

    pub fn current_mut(&mut self) -> Option<&mut Image> {
        self.cursor.index().and_then(|index| self.images.get_mut(index))
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn get(&self, id: ImageId) -> Option<&Image> {
        self.images.iter().find(|image| image.id() == id)
    }

    pub fn get_mut(&mut self, id: ImageId) -> Option<&mut Image> {
        self.images.iter_mut().find(|image| image.id() == id)
    }

    pub fn position(&self, id: ImageId) -> Option<usize> {
        self.images.iter().position(|image| image.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Image> {
        self.images.iter()
    }

    /// All images in navigation order.
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Base directory that relative `filename`s are resolved against, if one
    /// was set by a bulk load.
    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    pub fn set_base_path(&mut self, base_path: impl Into<PathBuf>) {
        self.base_path = Some(base_path.into());
    }
}

impl<'a> IntoIterator for &'a ImageCollection {
    type Item = &'a Image;
    type IntoIter = std::slice::Iter<'a, Image>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}
