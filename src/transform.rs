//! Display <-> image coordinate transform.
//!
//! An image is shown scaled to fit a viewport (aspect ratio preserved) and
//! centered in it. [`ViewTransform`] caches the resulting scale factor and
//! centering offset and converts points and boxes between the two spaces.
//! It knows nothing about annotations or labels.
//!
//! All results are integer pixels. Scaling truncates toward zero, so a
//! round-trip through the other space can drift by up to one scale step.

use crate::model::{scale_truncate, BoundingBox, Point, Size};

/// Cached geometry for one image shown in one viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    natural: Size,
    displayed: Size,
    viewport: Size,
    scale_factor: f64,
    offset: Point,
}

impl ViewTransform {
    /// Fits an image of `natural` size inside `viewport`, keeping its aspect
    /// ratio, and centers it.
    pub fn fit(natural: Size, viewport: Size) -> Self {
        Self::with_display(natural, fit_within(natural, viewport), viewport)
    }

    /// Uses an explicit displayed size instead of computing the fit.
    pub fn with_display(natural: Size, displayed: Size, viewport: Size) -> Self {
        let mut transform = Self {
            natural,
            displayed,
            viewport,
            scale_factor: 1.0,
            offset: Point::default(),
        };
        transform.recompute();
        transform
    }

    /// Refits the current image into a new viewport.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.displayed = fit_within(self.natural, viewport);
        self.recompute();
    }

    /// Switches to a new source image in the same viewport.
    pub fn set_image(&mut self, natural: Size) {
        self.natural = natural;
        self.displayed = fit_within(natural, self.viewport);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.scale_factor = if self.natural.width > 0 && self.displayed.width > 0 {
            self.natural.width as f64 / self.displayed.width as f64
        } else {
            1.0
        };
        self.offset = Point::new(
            (self.viewport.width - self.displayed.width).div_euclid(2),
            (self.viewport.height - self.displayed.height).div_euclid(2),
        );
    }

    /// `natural_width / displayed_width`.
    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Top-left of the displayed image inside the viewport.
    #[inline]
    pub fn offset(&self) -> Point {
        self.offset
    }

    #[inline]
    pub fn natural_size(&self) -> Size {
        self.natural
    }

    #[inline]
    pub fn displayed_size(&self) -> Size {
        self.displayed
    }

    #[inline]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// True if a display point lies on the displayed image, edges included.
    pub fn is_on_image(&self, point: Point) -> bool {
        if self.displayed.is_empty() {
            return false;
        }
        self.offset.x <= point.x
            && point.x <= self.offset.x + self.displayed.width
            && self.offset.y <= point.y
            && point.y <= self.offset.y + self.displayed.height
    }

    /// Converts a display point to image pixels. No clamping.
    pub fn display_to_image(&self, point: Point) -> Point {
        Point::new(
            scale_truncate(point.x.saturating_sub(self.offset.x), self.scale_factor),
            scale_truncate(point.y.saturating_sub(self.offset.y), self.scale_factor),
        )
    }

    /// Converts a dragged display rectangle (two opposite corners, any
    /// order) into an image-space box clamped to the image.
    ///
    /// The origin is clamped into `[0, natural]` and the size is cut so the
    /// box never extends past the far edge. Out-of-range inputs saturate
    /// rather than overflow. The result may have zero width or height;
    /// rejecting that is the caller's job at commit time.
    pub fn display_rect_to_image(&self, a: Point, b: Point) -> BoundingBox {
        let rect = BoundingBox::from_corners(a, b);
        let mut bbox = rect
            .translated(-self.offset.x, -self.offset.y)
            .scaled(self.scale_factor);

        bbox.x = bbox.x.clamp(0, self.natural.width.max(0));
        bbox.y = bbox.y.clamp(0, self.natural.height.max(0));
        bbox.width = bbox.width.min(self.natural.width.saturating_sub(bbox.x));
        bbox.height = bbox.height.min(self.natural.height.saturating_sub(bbox.y));
        bbox
    }

    /// Converts an image point to display coordinates.
    pub fn image_to_display(&self, point: Point) -> Point {
        Point::new(
            unscale_truncate(point.x, self.scale_factor).saturating_add(self.offset.x),
            unscale_truncate(point.y, self.scale_factor).saturating_add(self.offset.y),
        )
    }

    /// Converts an image-space box to display coordinates for drawing.
    pub fn image_box_to_display(&self, bbox: &BoundingBox) -> BoundingBox {
        let origin = self.image_to_display(bbox.origin());
        BoundingBox::new(
            origin.x,
            origin.y,
            unscale_truncate(bbox.width, self.scale_factor),
            unscale_truncate(bbox.height, self.scale_factor),
        )
    }
}

#[inline]
fn unscale_truncate(value: i32, factor: f64) -> i32 {
    (value as f64 / factor) as i32
}

/// Largest size with `natural`'s aspect ratio that fits in `bounds`.
///
/// Integer arithmetic, truncating, so results match the usual
/// keep-aspect-ratio scaling of GUI toolkits.
pub fn fit_within(natural: Size, bounds: Size) -> Size {
    if natural.is_empty() || bounds.is_empty() {
        return Size::default();
    }

    let (nw, nh) = (natural.width as i64, natural.height as i64);
    let (bw, bh) = (bounds.width as i64, bounds.height as i64);

    let width_at_full_height = bh * nw / nh;
    if width_at_full_height <= bw {
        Size::new(width_at_full_height as i32, bounds.height)
    } else {
        Size::new(bounds.width, (bw * nh / nw) as i32)
    }
}

/// Fuzz-only entrypoint: fits `natural` into `viewport`, maps the drag
/// `a -> b` into image space and panics if the box leaves the image.
#[cfg(feature = "fuzzing")]
pub fn fuzz_display_rect(natural: Size, viewport: Size, a: Point, b: Point) {
    let transform = ViewTransform::fit(natural, viewport);
    let bbox = transform.display_rect_to_image(a, b);
    let natural = transform.natural_size();

    if natural.is_empty() {
        return;
    }
    assert!(bbox.x >= 0 && bbox.y >= 0, "origin outside image: {bbox:?}");
    assert!(bbox.width >= 0 && bbox.height >= 0, "negative size: {bbox:?}");
    assert!(bbox.x + bbox.width <= natural.width, "past right edge: {bbox:?}");
    assert!(bbox.y + bbox.height <= natural.height, "past bottom edge: {bbox:?}");
}
