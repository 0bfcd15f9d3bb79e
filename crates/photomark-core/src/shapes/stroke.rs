//! Free-hand stroke.

use super::{ItemId, ItemStyle, ItemTrait, PaintMode, StrokePaint};
use crate::geometry;
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A free-hand stroke (series of points), optionally an eraser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub(crate) id: ItemId,
    /// Points in drawing order.
    points: Vec<Point>,
    /// Style properties.
    pub style: ItemStyle,
    /// Clear pixels instead of painting color.
    #[serde(default)]
    pub erase: bool,
}

impl Stroke {
    /// Create a new empty stroke.
    pub fn new(style: ItemStyle, erase: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: Vec::new(),
            style,
            erase,
        }
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>, style: ItemStyle, erase: bool) -> Self {
        Self {
            points,
            ..Self::new(style, erase)
        }
    }

    /// Add a point to the path.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl ItemTrait for Stroke {
    fn id(&self) -> ItemId {
        self.id
    }

    fn bounds(&self) -> Rect {
        geometry::bounding_rect(&self.points).unwrap_or(Rect::ZERO)
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        let delta = Vec2::new(dx, dy);
        for point in &mut self.points {
            *point += delta;
        }
    }

    fn update_geometry(&mut self, _anchor: Point, current: Point) {
        self.add_point(current);
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();

        let Some(&first) = self.points.first() else {
            return path;
        };

        path.move_to(first);
        if self.points.len() == 1 {
            // Zero-length segment so round caps still leave a dot.
            path.line_to(first);
        }
        for point in self.points.iter().skip(1) {
            path.line_to(*point);
        }

        path
    }

    fn style(&self) -> &ItemStyle {
        &self.style
    }

    fn paint(&self) -> StrokePaint {
        StrokePaint {
            color: self.style.stroke(),
            width: self.style.stroke_width,
            mode: if self.erase {
                PaintMode::Clear
            } else {
                PaintMode::Color
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    #[test]
    fn test_stroke_creation() {
        let stroke = Stroke::new(ItemStyle::default(), false);
        assert!(stroke.is_empty());
        assert_eq!(stroke.bounds(), Rect::ZERO);
    }

    #[test]
    fn test_update_geometry_appends_and_ignores_anchor() {
        let mut stroke = Stroke::new(ItemStyle::default(), false);
        stroke.update_geometry(Point::new(999.0, 999.0), Point::new(1.0, 2.0));
        stroke.update_geometry(Point::new(-999.0, 0.0), Point::new(3.0, 4.0));
        assert_eq!(stroke.points(), &[Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
    }

    #[test]
    fn test_bounds_are_minimal_and_never_shrink() {
        let mut stroke = Stroke::new(ItemStyle::default(), false);
        let samples = [
            Point::new(50.0, 50.0),
            Point::new(60.0, 40.0),
            Point::new(55.0, 45.0),
            Point::new(10.0, 90.0),
            Point::new(30.0, 60.0),
        ];

        let mut previous: Option<Rect> = None;
        for (i, &p) in samples.iter().enumerate() {
            stroke.add_point(p);
            let bounds = stroke.bounds();
            assert_eq!(Some(bounds), geometry::bounding_rect(&samples[..=i]));
            if let Some(prev) = previous {
                assert_eq!(bounds.union(prev), bounds);
            }
            previous = Some(bounds);
        }
        assert_eq!(stroke.bounds(), Rect::new(10.0, 40.0, 60.0, 90.0));
    }

    #[test]
    fn test_translate() {
        let mut stroke = Stroke::from_points(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)],
            ItemStyle::default(),
            false,
        );
        stroke.translate(5.0, 1.0);
        assert_eq!(stroke.bounds(), Rect::new(5.0, 1.0, 15.0, 11.0));
    }

    #[test]
    fn test_single_point_path_is_a_dot() {
        let stroke = Stroke::from_points(vec![Point::new(3.0, 3.0)], ItemStyle::default(), false);
        let elements: Vec<PathEl> = stroke.to_path().elements().to_vec();
        assert_eq!(
            elements,
            vec![
                PathEl::MoveTo(Point::new(3.0, 3.0)),
                PathEl::LineTo(Point::new(3.0, 3.0)),
            ]
        );
    }

    #[test]
    fn test_erase_paint_mode() {
        let eraser = Stroke::new(ItemStyle::default(), true);
        assert_eq!(eraser.paint().mode, PaintMode::Clear);
        let pen = Stroke::new(ItemStyle::default(), false);
        assert_eq!(pen.paint().mode, PaintMode::Color);
    }
}
