//! The annotation entity: one labelled box on one image.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bbox::BoundingBox;
use super::ids::{AnnotationId, ImageId};
use crate::labels::LabelId;

/// A labelled bounding box.
///
/// The id is assigned at construction and cannot be changed afterwards.
/// `image_id` is a back-reference only: the owning [`Image`](super::Image)
/// holds the annotation itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    id: AnnotationId,

    /// Box in image pixel coordinates.
    pub bounding_box: BoundingBox,

    /// Label id from the project label set.
    pub label_id: LabelId,

    /// Label name cached at assignment time.
    pub label_name: String,

    /// Image this annotation belongs to.
    pub image_id: ImageId,

    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Annotation {
    /// Creates an annotation with a freshly generated id.
    pub fn new(
        image_id: ImageId,
        bounding_box: BoundingBox,
        label_id: impl Into<LabelId>,
        label_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AnnotationId::generate(),
            bounding_box,
            label_id: label_id.into(),
            label_name: label_name.into(),
            image_id,
            created_at: now,
            modified_at: now,
        }
    }

    #[inline]
    pub fn id(&self) -> AnnotationId {
        self.id
    }

    /// Replaces the box and bumps `modified_at`.
    pub fn set_box(&mut self, bounding_box: BoundingBox) {
        self.bounding_box = bounding_box;
        self.touch();
    }

    /// Replaces the label (id and name together) and bumps `modified_at`.
    pub fn set_label(&mut self, label_id: LabelId, label_name: impl Into<String>) {
        self.label_id = label_id;
        self.label_name = label_name.into();
        self.touch();
    }

    fn touch(&mut self) {
        // Never move backwards, even if the wall clock does.
        self.modified_at = Utc::now().max(self.modified_at);
    }
}
