//! Ellipse shape.

use super::{Frame, ItemId, ItemStyle, ItemTrait, ParametricShape};
use kurbo::{Affine, BezPath, Ellipse as KurboEllipse, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An outlined oval inscribed in its frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub(crate) id: ItemId,
    pub frame: Frame,
    /// Style properties.
    pub style: ItemStyle,
}

impl Ellipse {
    /// Create an ellipse from a bounding rectangle.
    pub fn new(rect: Rect, style: ItemStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame: Frame::new(rect),
            style,
        }
    }

    /// Get as a kurbo Ellipse.
    pub fn as_kurbo(&self) -> KurboEllipse {
        KurboEllipse::from_rect(self.frame.rect)
    }
}

impl ItemTrait for Ellipse {
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
        self.as_kurbo().to_path(0.1)
    }

    fn paint_transform(&self) -> Affine {
        self.frame.paint_transform()
    }

    fn style(&self) -> &ItemStyle {
        &self.style
    }
}

impl ParametricShape for Ellipse {
    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }
}
