//! Arrow shape.

use super::{Frame, ItemId, ItemStyle, ItemTrait, ParametricShape};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shortest arrowhead, in canvas units.
pub const MIN_HEAD_LENGTH: f64 = 8.0;
/// Longest arrowhead, in canvas units.
pub const MAX_HEAD_LENGTH: f64 = 20.0;

/// An arrow along the horizontal centerline of its frame, pointing right.
///
/// Any other direction comes from the frame's rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    pub(crate) id: ItemId,
    pub frame: Frame,
    /// Style properties.
    pub style: ItemStyle,
}

impl Arrow {
    /// Create a new arrow.
    pub fn new(rect: Rect, style: ItemStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame: Frame::new(rect),
            style,
        }
    }

    /// Length of each arrowhead wing along the shaft.
    pub fn head_length(&self) -> f64 {
        (self.frame.rect.width() / 6.0).clamp(MIN_HEAD_LENGTH, MAX_HEAD_LENGTH)
    }

    /// Shaft endpoints (tail, tip).
    pub fn shaft(&self) -> (Point, Point) {
        let rect = self.frame.rect;
        let cy = rect.center().y;
        (Point::new(rect.x0, cy), Point::new(rect.x1, cy))
    }
}

impl ItemTrait for Arrow {
    fn id(&self) -> ItemId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.frame.rect
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.frame.translate(dx, dy);
    }

    fn update_geometry(&mut self, anchor: Point, current: Point) {
        self.frame.span(anchor, current);
    }

    fn to_path(&self) -> BezPath {
        let (tail, tip) = self.shaft();
        let head = self.head_length();

        let mut path = BezPath::new();
        path.move_to(tail);
        path.line_to(tip);

        // Two wings swept back from the tip at a fixed 2:1 proportion.
        path.move_to(Point::new(tip.x - head, tip.y - head / 2.0));
        path.line_to(tip);
        path.line_to(Point::new(tip.x - head, tip.y + head / 2.0));

        path
    }

    fn paint_transform(&self) -> Affine {
        self.frame.paint_transform()
    }

    fn style(&self) -> &ItemStyle {
        &self.style
    }
}

impl ParametricShape for Arrow {
    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }
}
