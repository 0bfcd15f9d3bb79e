//! Check mark shape.

use super::{Frame, ItemId, ItemStyle, ItemTrait, ParametricShape};
use kurbo::{Affine, BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Check mark vertices in unit coordinates of the frame.
const CHECK_POINTS: [(f64, f64); 3] = [(0.15, 0.55), (0.40, 0.80), (0.85, 0.25)];

/// A check mark stamped inside its frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub(crate) id: ItemId,
    pub frame: Frame,
    /// Style properties.
    pub style: ItemStyle,
}

impl Check {
    pub fn new(rect: Rect, style: ItemStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            frame: Frame::new(rect),
            style,
        }
    }
}

impl ItemTrait for Check {
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
        let mut path = BezPath::new();
        for (i, &(u, v)) in CHECK_POINTS.iter().enumerate() {
            let point = self.frame.relative(u, v);
            if i == 0 {
                path.move_to(point);
            } else {
                path.line_to(point);
            }
        }
        path
    }

    fn paint_transform(&self) -> Affine {
        self.frame.paint_transform()
    }

    fn style(&self) -> &ItemStyle {
        &self.style
    }
}

impl ParametricShape for Check {
    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }
}
