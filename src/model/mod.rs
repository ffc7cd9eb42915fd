//! Annotation data model.
//!
//! This module defines the entities an annotation project works with:
//! integer pixel bounding boxes, annotations that attach a label to a box,
//! and images that own their annotations.
//!
//! # Ownership
//!
//! An [`Image`] owns its [`Annotation`]s in display order. An annotation
//! points back at its image through [`ImageId`] only; there are no cyclic
//! references. Lookup indexes (see [`crate::store`]) hold ids, never a
//! second copy.
//!
//! # Example
//!
//! ```
//! use boxlabel::model::{Annotation, BoundingBox, Image};
//!
//! let mut image = Image::new("/data/train/cat.jpg", "train/cat.jpg", 640, 480);
//! let ann = Annotation::new(image.id(), BoundingBox::new(10, 20, 90, 60), 1, "cat");
//! image.add_annotation(ann);
//! assert_eq!(image.annotations.len(), 1);
//! ```

mod annotation;
mod bbox;
mod ids;
mod image;

pub use annotation::Annotation;
pub use bbox::{BoundingBox, Point, Size};
pub(crate) use bbox::scale_truncate;
pub use ids::{AnnotationId, ImageId};
pub use image::{Image, ImageFormat};
