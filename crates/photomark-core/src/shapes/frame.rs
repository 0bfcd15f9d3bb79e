//! Rectangle-plus-rotation geometry shared by parametric shapes.

use crate::geometry;
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// The canonical geometry of a parametric shape.
///
/// `rect` is always normalized. `rotation` is applied about the rectangle's
/// center when painting and is never folded into `rect`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub rect: Rect,
    #[serde(default)]
    pub rotation: f64,
}

impl Frame {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect: rect.abs(),
            rotation: 0.0,
        }
    }

    /// A zero-sized frame at `anchor`, ready to be dragged open.
    pub fn at(anchor: Point) -> Self {
        Self::new(Rect::from_points(anchor, anchor))
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.rect = self.rect + Vec2::new(dx, dy);
    }

    pub fn span(&mut self, p1: Point, p2: Point) {
        self.rect = geometry::normalized_rect(p1, p2);
    }

    pub fn scale_from(&mut self, original: Rect, factor: f64) {
        self.rect = geometry::scale_about_center(original, factor);
    }

    /// Rotation about the rectangle center.
    pub fn paint_transform(&self) -> Affine {
        if self.rotation == 0.0 {
            Affine::IDENTITY
        } else {
            Affine::rotate_about(self.rotation, self.rect.center())
        }
    }

    /// Map a point given in unit coordinates of the rectangle.
    pub fn relative(&self, u: f64, v: f64) -> Point {
        Point::new(
            self.rect.x0 + u * self.rect.width(),
            self.rect.y0 + v * self.rect.height(),
        )
    }
}
