//! The active annotation project.
//!
//! A [`Session`] owns the label registry, the image collection and the
//! annotation index, and keeps the three consistent: annotations are only
//! created with registered labels, removing an image drops its annotations
//! from the index, and imported images are indexed as they are added.

use std::path::Path;

use crate::collection::{BulkLoad, ImageCollection, SkippedFile};
use crate::error::BoxlabelError;
use crate::io::{self, CocoImport};
use crate::labels::{LabelConflict, LabelId, LabelRegistry};
use crate::loader::ImageLoader;
use crate::model::{Annotation, AnnotationId, BoundingBox, Image, ImageId};
use crate::stats::ExportStats;
use crate::store::AnnotationStore;

/// Asks the user which label a freshly drawn box gets.
pub trait LabelPicker {
    /// Returns the chosen `(id, name)`, or `None` if the user cancelled.
    fn pick(&self, labels: &LabelRegistry) -> Option<(LabelId, String)>;
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    pub labels: LabelRegistry,
    pub images: ImageCollection,
    pub store: AnnotationStore,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose store skips annotation validation.
    pub fn without_validation() -> Self {
        Self {
            store: AnnotationStore::new(false),
            ..Self::default()
        }
    }

    pub fn current_image_id(&self) -> Result<ImageId, BoxlabelError> {
        self.images
            .current()
            .map(Image::id)
            .ok_or(BoxlabelError::NoCurrentImage)
    }

    /// Annotates the current image with a registered label.
    ///
    /// # Errors
    /// [`BoxlabelError::NoCurrentImage`], [`BoxlabelError::UnknownLabel`], or
    /// a validation error from the store.
    pub fn annotate(
        &mut self,
        bounding_box: BoundingBox,
        label_id: LabelId,
    ) -> Result<Annotation, BoxlabelError> {
        let image_id = self.current_image_id()?;
        let label_name = self
            .labels
            .name_of(label_id)
            .ok_or(BoxlabelError::UnknownLabel(label_id))?
            .to_string();

        self.store.create(
            &mut self.images,
            image_id,
            Some(bounding_box),
            label_id,
            &label_name,
        )
    }

    /// Like [`Session::annotate`], but lets `picker` choose the label.
    ///
    /// Returns `Ok(None)` if the picker was cancelled. The picker is not
    /// consulted when there is no current image.
    pub fn annotate_with(
        &mut self,
        bounding_box: BoundingBox,
        picker: &dyn LabelPicker,
    ) -> Result<Option<Annotation>, BoxlabelError> {
        self.current_image_id()?;
        let Some((label_id, _)) = picker.pick(&self.labels) else {
            log::debug!("label selection cancelled");
            return Ok(None);
        };
        self.annotate(bounding_box, label_id).map(Some)
    }

    pub fn delete_annotation(&mut self, id: AnnotationId) -> bool {
        self.store.delete(&mut self.images, id)
    }

    /// Removes an image and everything annotated on it.
    pub fn remove_image(&mut self, id: ImageId) -> Option<Image> {
        let image = self.images.remove(id)?;
        let dropped = self.store.forget_image(&image);
        log::debug!("dropped {} annotation(s) with image {}", dropped, id);
        Some(image)
    }

    /// Loads one image file and appends it to the collection.
    pub fn load_image(
        &mut self,
        path: &Path,
        loader: &dyn ImageLoader,
    ) -> Result<ImageId, BoxlabelError> {
        let image = loader.load(path)?;
        let file_path = image.file_path.clone();
        Ok(self.images.add(file_path, image))
    }

    /// Loads several files, skipping (and reporting) the ones that fail.
    pub fn load_images<P: AsRef<Path>>(&mut self, paths: &[P], loader: &dyn ImageLoader) -> BulkLoad {
        let mut outcome = BulkLoad::default();
        for path in paths {
            let path = path.as_ref();
            match self.load_image(path, loader) {
                Ok(_) => outcome.loaded += 1,
                Err(err) => {
                    log::warn!("Could not load {}: {}", path.display(), err);
                    outcome.skipped.push(SkippedFile {
                        path: path.to_path_buf(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        outcome
    }

    /// See [`ImageCollection::bulk_load`].
    pub fn bulk_load<S: AsRef<Path>>(
        &mut self,
        base_path: &Path,
        subdirectories: &[S],
        loader: &dyn ImageLoader,
    ) -> Result<BulkLoad, BoxlabelError> {
        self.images.bulk_load(base_path, subdirectories, loader)
    }

    /// Adds imported images and labels to the session.
    ///
    /// Every image is appended and its annotations indexed. An imported
    /// label is registered only if neither its id nor its name is taken by a
    /// different label; the rest are returned and the registry keeps its
    /// existing entries. Annotations keep the names they were imported with.
    pub fn merge_import(&mut self, import: CocoImport) -> Vec<LabelConflict> {
        let conflicts = self.labels.merge(&import.labels);
        for conflict in &conflicts {
            log::warn!(
                "Imported label {} '{}' not registered: {}",
                conflict.label_id,
                conflict.label_name,
                conflict.reason
            );
        }

        for image in import.images {
            self.store.index_image(&image);
            let file_path = image.file_path.clone();
            self.images.add(file_path, image);
        }
        conflicts
    }

    pub fn stats(&self) -> ExportStats {
        ExportStats::from_images(self.images.images())
    }

    pub fn export_csv(&self, path: &Path) -> Result<(), BoxlabelError> {
        io::write_csv(path, self.images.images())
    }

    pub fn export_coco(&self, path: &Path) -> Result<(), BoxlabelError> {
        io::write_coco_json(path, self.images.images())
    }
}
