//! Integer bounding boxes and the point/size values they are built from.

use serde::{Deserialize, Serialize};

/// A point in integer pixel space. Which space (display or image) is up to
/// the caller; the transform engine converts between them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width and height in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[inline]
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns true if either dimension is zero or negative.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// An axis-aligned rectangle in XYWH format with a top-left origin.
///
/// Like the rest of the model this type is permissive: a zero or negative
/// size is representable so that a box being dragged can exist before it
/// is checked. The annotation store rejects such boxes at commit time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    /// Creates a new bounding box.
    #[inline]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a box from two opposite corners given in any order.
    ///
    /// The result always has a non-negative width and height.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: span(a.x, b.x),
            height: span(a.y, b.y),
        }
    }

    /// Creates a box from a COCO `[x, y, width, height]` array.
    ///
    /// Fractional values are truncated toward zero.
    pub fn from_coco(bbox: [f64; 4]) -> Self {
        let [x, y, w, h] = bbox;
        Self::new(x as i32, y as i32, w as i32, h as i32)
    }

    /// Converts to COCO `[x, y, width, height]`.
    pub fn to_coco(&self) -> [f64; 4] {
        [
            self.x as f64,
            self.y as f64,
            self.width as f64,
            self.height as f64,
        ]
    }

    /// Returns true if the point lies inside the box, edges included.
    ///
    /// The far edges are computed in `i64`, so boxes reaching past
    /// `i32::MAX` (e.g. from an imported COCO file) hit-test correctly.
    #[inline]
    pub fn contains_point(&self, px: i32, py: i32) -> bool {
        let (px, py) = (px as i64, py as i64);
        let (x, y) = (self.x as i64, self.y as i64);
        x <= px && px <= x + self.width as i64 && y <= py && py <= y + self.height as i64
    }

    /// Returns the area in square pixels.
    ///
    /// Negative if exactly one dimension is negative.
    #[inline]
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Returns true if both width and height are strictly positive.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Top-left corner.
    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Multiplies every component by `factor`, truncating toward zero.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            scale_truncate(self.x, factor),
            scale_truncate(self.y, factor),
            scale_truncate(self.width, factor),
            scale_truncate(self.height, factor),
        )
    }

    /// Moves the origin by `(dx, dy)`, saturating at the `i32` range; size
    /// is unchanged.
    #[inline]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }
}

/// Distance between two coordinates, saturating at `i32::MAX`.
#[inline]
fn span(a: i32, b: i32) -> i32 {
    (b as i64 - a as i64).abs().min(i32::MAX as i64) as i32
}

/// Scales an integer by a float factor and truncates back toward zero.
///
/// This is the one place the ±1px drift of display/image round-trips comes
/// from.
#[inline]
pub(crate) fn scale_truncate(value: i32, factor: f64) -> i32 {
    (value as f64 * factor) as i32
}
