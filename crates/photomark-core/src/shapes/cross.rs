//! Cross (X) shape.

use super::{Frame, ItemId, ItemStyle, ItemTrait, ParametricShape};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Both diagonals of the frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cross {
    pub(crate) id: ItemId,
    pub frame: Frame,
    /// Style properties.
    pub style: ItemStyle,
}

impl Cross {
    pub fn new(rect: Rect, style: ItemStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame: Frame::new(rect),
            style,
        }
    }
}

impl ItemTrait for Cross {
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
        let rect = self.frame.rect;
        let mut path = BezPath::new();
        path.move_to(Point::new(rect.x0, rect.y0));
        path.line_to(Point::new(rect.x1, rect.y1));
        path.move_to(Point::new(rect.x1, rect.y0));
        path.line_to(Point::new(rect.x0, rect.y1));
        path
    }

    fn paint_transform(&self) -> Affine {
        self.frame.paint_transform()
    }

    fn style(&self) -> &ItemStyle {
        &self.style
    }
}

impl ParametricShape for Cross {
    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }
}
