//! Pointer interaction on a displayed image: drawing new boxes and picking
//! existing ones.
//!
//! A drag is permissive while it is in progress ([`Canvas::preview_box`] may
//! be empty) and strict when it ends: [`Canvas::release`] only yields a box
//! of at least [`MIN_BOX_SIZE`] on each side.

use crate::model::{Annotation, AnnotationId, BoundingBox, Point, Size};
use crate::transform::ViewTransform;

/// Smallest width and height, in image pixels, of a committed drawn box.
pub const MIN_BOX_SIZE: i32 = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Draw,
    Select,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Drag {
    start: Point,
    current: Point,
}

/// Mode, transform and in-progress drag state for one view.
#[derive(Clone, Debug)]
pub struct Canvas {
    transform: ViewTransform,
    mode: InteractionMode,
    drag: Option<Drag>,
    selected: Option<AnnotationId>,
}

impl Canvas {
    pub fn new(transform: ViewTransform) -> Self {
        Self {
            transform,
            mode: InteractionMode::default(),
            drag: None,
            selected: None,
        }
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Switches mode and abandons any drag in progress.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
        self.drag = None;
    }

    /// Shows a different image. Drag and selection belong to the old one and
    /// are cleared.
    pub fn set_image(&mut self, natural: Size) {
        self.transform.set_image(natural);
        self.drag = None;
        self.selected = None;
    }

    pub fn resize(&mut self, viewport: Size) {
        self.transform.resize(viewport);
    }

    pub fn is_drawing(&self) -> bool {
        self.drag.is_some()
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Primary button down at a display point.
    ///
    /// Ignored off the image. In draw mode this starts a drag; in select
    /// mode it hit-tests `annotations` (see [`Canvas::select_at`]).
    pub fn press(&mut self, point: Point, annotations: &[Annotation]) {
        if !self.transform.is_on_image(point) {
            return;
        }

        match self.mode {
            InteractionMode::Draw => {
                self.drag = Some(Drag {
                    start: point,
                    current: point,
                });
            }
            InteractionMode::Select => {
                self.select_at(point, annotations);
            }
        }
    }

    /// Pointer moved with the button held.
    pub fn drag(&mut self, point: Point) {
        if let Some(drag) = self.drag.as_mut() {
            drag.current = point;
        }
    }

    /// Box currently being dragged out, in image coordinates.
    pub fn preview_box(&self) -> Option<BoundingBox> {
        self.drag
            .map(|drag| self.transform.display_rect_to_image(drag.start, drag.current))
    }

    /// Same as [`Canvas::preview_box`] but in display coordinates, for
    /// drawing the rubber band.
    pub fn preview_rect(&self) -> Option<BoundingBox> {
        self.drag
            .map(|drag| BoundingBox::from_corners(drag.start, drag.current))
    }

    /// Primary button up. Ends the drag and returns the drawn box if it is
    /// large enough to keep.
    pub fn release(&mut self, point: Point) -> Option<BoundingBox> {
        self.drag(point);
        let bbox = self.preview_box();
        self.drag = None;

        let bbox = bbox?;
        if bbox.width >= MIN_BOX_SIZE && bbox.height >= MIN_BOX_SIZE {
            Some(bbox)
        } else {
            log::debug!(
                "discarding {}x{} box below minimum size {}",
                bbox.width,
                bbox.height,
                MIN_BOX_SIZE
            );
            None
        }
    }

    /// Selects the first annotation whose box contains the display point.
    /// A miss clears the selection.
    pub fn select_at(&mut self, point: Point, annotations: &[Annotation]) -> Option<AnnotationId> {
        let at = self.transform.display_to_image(point);
        self.selected = annotations
            .iter()
            .find(|annotation| annotation.bounding_box.contains_point(at.x, at.y))
            .map(Annotation::id);
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageId;

    fn canvas() -> Canvas {
        Canvas::new(ViewTransform::with_display(
            Size::new(1000, 800),
            Size::new(500, 400),
            Size::new(600, 500),
        ))
    }

    fn annotation(x: i32, y: i32, w: i32, h: i32) -> Annotation {
        Annotation::new(ImageId::generate(), BoundingBox::new(x, y, w, h), 1, "cat")
    }

    #[test]
    fn draw_commits_image_space_box() {
        let mut canvas = canvas();
        canvas.press(Point::new(100, 100), &[]);
        assert!(canvas.is_drawing());

        canvas.drag(Point::new(120, 110));
        assert_eq!(canvas.preview_box(), Some(BoundingBox::new(100, 100, 40, 20)));

        let bbox = canvas.release(Point::new(150, 130));
        assert_eq!(bbox, Some(BoundingBox::new(100, 100, 100, 60)));
        assert!(!canvas.is_drawing());
    }

    #[test]
    fn reverse_drag_is_normalized() {
        let mut canvas = canvas();
        canvas.press(Point::new(150, 130), &[]);
        let bbox = canvas.release(Point::new(100, 100));
        assert_eq!(bbox, Some(BoundingBox::new(100, 100, 100, 60)));
    }

    #[test]
    fn tiny_drag_is_previewed_but_not_committed() {
        let mut canvas = canvas();
        canvas.press(Point::new(100, 100), &[]);
        canvas.drag(Point::new(100, 100));
        assert_eq!(canvas.preview_box(), Some(BoundingBox::new(100, 100, 0, 0)));

        // 2 display px -> 4 image px, one short of the minimum.
        assert_eq!(canvas.release(Point::new(102, 102)), None);

        canvas.press(Point::new(100, 100), &[]);
        assert!(canvas.release(Point::new(103, 103)).is_some());
    }

    #[test]
    fn press_off_image_does_nothing() {
        let mut canvas = canvas();
        canvas.press(Point::new(10, 10), &[]);
        assert!(!canvas.is_drawing());
        assert_eq!(canvas.release(Point::new(200, 200)), None);
    }

    #[test]
    fn mode_switch_abandons_drag() {
        let mut canvas = canvas();
        canvas.press(Point::new(100, 100), &[]);
        canvas.set_mode(InteractionMode::Select);
        assert!(!canvas.is_drawing());
        assert_eq!(canvas.release(Point::new(200, 200)), None);
    }

    #[test]
    fn select_first_match_wins_and_miss_clears() {
        let mut canvas = canvas();
        canvas.set_mode(InteractionMode::Select);

        let annotations = vec![annotation(0, 0, 300, 300), annotation(100, 100, 50, 50)];

        // display (110, 110) -> image (120, 120), inside both boxes.
        canvas.press(Point::new(110, 110), &annotations);
        assert_eq!(canvas.selected(), Some(annotations[0].id()));
        assert!(!canvas.is_drawing());

        // display (400, 400) -> image (700, 700), inside neither.
        canvas.press(Point::new(400, 400), &annotations);
        assert_eq!(canvas.selected(), None);
    }

    #[test]
    fn changing_image_clears_selection() {
        let mut canvas = canvas();
        let annotations = vec![annotation(0, 0, 300, 300)];
        canvas.select_at(Point::new(60, 60), &annotations);
        assert!(canvas.selected().is_some());

        canvas.set_image(Size::new(640, 480));
        assert_eq!(canvas.selected(), None);
    }
}
