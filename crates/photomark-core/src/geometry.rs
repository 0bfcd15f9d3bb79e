//! Geometry helpers shared by items, gestures and renderers.
//!
//! Points, rectangles and paths are kurbo types; this module only adds the
//! handful of operations the annotation engine needs on top of them.

use kurbo::{Point, Rect, Size};

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).hypot()
}

/// Angle of the vector `a → b` in radians, in `(-π, π]`.
pub fn angle(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Normalized (min/max) rectangle spanned by two points, in either order.
pub fn normalized_rect(p1: Point, p2: Point) -> Rect {
    Rect::new(
        p1.x.min(p2.x),
        p1.y.min(p2.y),
        p1.x.max(p2.x),
        p1.y.max(p2.y),
    )
}

/// Smallest rectangle enclosing all points, or `None` when there are none.
pub fn bounding_rect(points: &[Point]) -> Option<Rect> {
    let first = points.first()?;
    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x;
    let mut max_y = first.y;

    for point in &points[1..] {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Some(Rect::new(min_x, min_y, max_x, max_y))
}

/// Scale `rect` by `factor` about its own center.
///
/// Each edge moves away from the center by `(factor - 1)` times its current
/// offset, so a factor of exactly `1.0` returns `rect` bit-for-bit.
pub fn scale_about_center(rect: Rect, factor: f64) -> Rect {
    let center = rect.center();
    let k = factor - 1.0;
    Rect::new(
        rect.x0 + (rect.x0 - center.x) * k,
        rect.y0 + (rect.y0 - center.y) * k,
        rect.x1 + (rect.x1 - center.x) * k,
        rect.y1 + (rect.y1 - center.y) * k,
    )
}

/// Aspect-preserving fit of `content` into `container`, centered (letterboxed).
///
/// Returns the destination rectangle in container coordinates. Degenerate
/// content yields an empty rectangle at the container's center.
pub fn fit_rect(content: Size, container: Size) -> Rect {
    if content.width <= 0.0 || content.height <= 0.0 {
        let center = Point::new(container.width / 2.0, container.height / 2.0);
        return Rect::from_center_size(center, Size::ZERO);
    }

    let scale = (container.width / content.width).min(container.height / content.height);
    let size = Size::new(content.width * scale, content.height * scale);
    let origin = Point::new(
        (container.width - size.width) / 2.0,
        (container.height - size.height) / 2.0,
    );
    Rect::from_origin_size(origin, size)
}
