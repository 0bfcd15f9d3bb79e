//! Rectangle shape.

use super::{Frame, ItemId, ItemStyle, ItemTrait, ParametricShape};
use kurbo::{Affine, BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An outlined rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ItemId,
    pub frame: Frame,
    /// Style properties.
    pub style: ItemStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(rect: Rect, style: ItemStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame: Frame::new(rect),
            style,
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point, style: ItemStyle) -> Self {
        Self::new(Rect::from_points(p1, p2), style)
    }
}

impl ItemTrait for Rectangle {
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
        self.frame.rect.to_path(0.1)
    }

    fn paint_transform(&self) -> Affine {
        self.frame.paint_transform()
    }

    fn style(&self) -> &ItemStyle {
        &self.style
    }
}

impl ParametricShape for Rectangle {
    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }
}
