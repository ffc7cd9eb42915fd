//! Annotation CRUD and validation.
//!
//! The store is an id index over annotations that live inside the images of
//! an [`ImageCollection`]. It never owns an annotation: every operation takes
//! the collection by reference and reads or mutates the owning image.

use std::collections::HashMap;

use crate::collection::ImageCollection;
use crate::error::{BoxlabelError, ValidationError};
use crate::labels::LabelId;
use crate::model::{Annotation, AnnotationId, BoundingBox, Image, ImageId};

/// Checks an annotation against the label and geometry rules.
///
/// Pure: nothing is mutated. Import paths call this directly when they want
/// the check without going through a store.
pub fn validate(annotation: &Annotation) -> Result<(), ValidationError> {
    validate_parts(
        Some(&annotation.bounding_box),
        annotation.label_id,
        &annotation.label_name,
    )
}

/// Checks the raw parts of a prospective annotation.
///
/// Rules are applied in order: positive label id, non-blank label name,
/// box present, box with positive width and height.
pub fn validate_parts(
    bounding_box: Option<&BoundingBox>,
    label_id: LabelId,
    label_name: &str,
) -> Result<(), ValidationError> {
    validate_label(label_id, label_name)?;
    let bbox = bounding_box.ok_or(ValidationError::MissingBox)?;
    validate_box(bbox)
}

fn validate_label(label_id: LabelId, label_name: &str) -> Result<(), ValidationError> {
    if !label_id.is_positive() {
        return Err(ValidationError::NonPositiveLabelId(label_id.as_i64()));
    }
    if label_name.trim().is_empty() {
        return Err(ValidationError::BlankLabelName);
    }
    Ok(())
}

fn validate_box(bbox: &BoundingBox) -> Result<(), ValidationError> {
    if !bbox.is_positive() {
        return Err(ValidationError::NonPositiveSize {
            width: bbox.width,
            height: bbox.height,
        });
    }
    Ok(())
}

/// Index of annotation id -> owning image id.
#[derive(Clone, Debug)]
pub struct AnnotationStore {
    validation_enabled: bool,
    index: HashMap<AnnotationId, ImageId>,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AnnotationStore {
    /// Creates an empty store.
    ///
    /// With `validation_enabled == false` the label and size checks are
    /// skipped on create and update; import paths that have already
    /// validated their input use this.
    pub fn new(validation_enabled: bool) -> Self {
        Self {
            validation_enabled,
            index: HashMap::new(),
        }
    }

    pub fn validation_enabled(&self) -> bool {
        self.validation_enabled
    }

    /// Creates an annotation on `image_id` and returns a copy of it.
    ///
    /// # Errors
    /// - [`BoxlabelError::Validation`] if the parts fail validation. A
    ///   missing box is rejected even with validation disabled.
    /// - [`BoxlabelError::UnknownImage`] if the image is not in `images`.
    ///
    /// Nothing is mutated on error.
    pub fn create(
        &mut self,
        images: &mut ImageCollection,
        image_id: ImageId,
        bounding_box: Option<BoundingBox>,
        label_id: LabelId,
        label_name: &str,
    ) -> Result<Annotation, BoxlabelError> {
        if self.validation_enabled {
            validate_parts(bounding_box.as_ref(), label_id, label_name)?;
        }
        let bbox = bounding_box.ok_or(ValidationError::MissingBox)?;

        let image = images
            .get_mut(image_id)
            .ok_or(BoxlabelError::UnknownImage(image_id))?;

        let annotation = Annotation::new(image_id, bbox, label_id, label_name);
        image.add_annotation(annotation.clone());
        self.index.insert(annotation.id(), image_id);

        log::debug!(
            "created annotation {} ({}) on image {}",
            annotation.id().short(),
            annotation.label_name,
            image_id
        );
        Ok(annotation)
    }

    /// Looks up an annotation by id.
    pub fn get<'a>(&self, images: &'a ImageCollection, id: AnnotationId) -> Option<&'a Annotation> {
        let image_id = self.index.get(&id)?;
        images.get(*image_id)?.annotation(id)
    }

    /// Updates the box and/or the label of an annotation.
    ///
    /// The label is an `(id, name)` pair so the two can never drift apart.
    /// Each applied part bumps `modified_at`.
    ///
    /// Returns `Ok(false)` if the id is unknown. With validation enabled an
    /// invalid box or label is rejected and the annotation is left as it was.
    pub fn update(
        &mut self,
        images: &mut ImageCollection,
        id: AnnotationId,
        bounding_box: Option<BoundingBox>,
        label: Option<(LabelId, String)>,
    ) -> Result<bool, ValidationError> {
        let validation_enabled = self.validation_enabled;
        let Some(annotation) = self.annotation_mut(images, id) else {
            return Ok(false);
        };

        if validation_enabled {
            if let Some(bbox) = &bounding_box {
                validate_box(bbox)?;
            }
            if let Some((label_id, label_name)) = &label {
                validate_label(*label_id, label_name)?;
            }
        }

        if let Some(bbox) = bounding_box {
            annotation.set_box(bbox);
        }
        if let Some((label_id, label_name)) = label {
            annotation.set_label(label_id, label_name);
        }
        Ok(true)
    }

    /// Deletes an annotation from its image and from the index.
    pub fn delete(&mut self, images: &mut ImageCollection, id: AnnotationId) -> bool {
        let Some(image_id) = self.index.remove(&id) else {
            return false;
        };
        images
            .get_mut(image_id)
            .and_then(|image| image.remove_annotation(id))
            .is_some()
    }

    /// Annotations of one image, in the image's display order.
    pub fn list_for_image<'a>(
        &self,
        images: &'a ImageCollection,
        image_id: ImageId,
    ) -> &'a [Annotation] {
        images
            .get(image_id)
            .map(|image| image.annotations.as_slice())
            .unwrap_or(&[])
    }

    /// Every indexed annotation, in collection order.
    pub fn all<'a>(&'a self, images: &'a ImageCollection) -> impl Iterator<Item = &'a Annotation> {
        images
            .iter()
            .flat_map(|image| image.annotations.iter())
            .filter(|ann| self.index.contains_key(&ann.id()))
    }

    /// Indexes every annotation an image already carries (e.g. after import).
    pub fn index_image(&mut self, image: &Image) {
        for annotation in &image.annotations {
            self.index.insert(annotation.id(), image.id());
        }
    }

    /// Drops the index entries of an image that left the collection.
    ///
    /// Returns how many entries were removed.
    pub fn forget_image(&mut self, image: &Image) -> usize {
        let before = self.index.len();
        self.index.retain(|_, owner| *owner != image.id());
        before - self.index.len()
    }

    pub fn contains(&self, id: AnnotationId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn annotation_mut<'a>(
        &self,
        images: &'a mut ImageCollection,
        id: AnnotationId,
    ) -> Option<&'a mut Annotation> {
        let image_id = self.index.get(&id)?;
        images.get_mut(*image_id)?.annotation_mut(id)
    }
}
