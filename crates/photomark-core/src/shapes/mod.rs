//! Drawable annotation items.
//!
//! An [`Item`] is either a free-hand [`Stroke`] or one of the parametric
//! shapes, which all keep their geometry in a [`Frame`] (a rectangle plus a
//! paint-time rotation).

mod arrow;
mod check;
mod cross;
mod ellipse;
mod frame;
mod rectangle;
mod stroke;

pub use arrow::Arrow;
pub use check::Check;
pub use cross::Cross;
pub use ellipse::Ellipse;
pub use frame::Frame;
pub use rectangle::Rectangle;
pub use stroke::Stroke;

use kurbo::{Affine, BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn red() -> Self {
        Self::new(255, 0, 0, 255)
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().strip_prefix('#')?;
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties captured when an item is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStyle {
    /// Stroke color.
    pub stroke_color: SerializableColor,
    /// Stroke width in canvas units.
    pub stroke_width: f64,
}

impl ItemStyle {
    pub fn new(stroke_color: SerializableColor, stroke_width: f64) -> Self {
        Self {
            stroke_color,
            stroke_width,
        }
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.stroke_color.into()
    }
}

impl Default for ItemStyle {
    fn default() -> Self {
        Self::new(SerializableColor::black(), 4.0)
    }
}

/// Unique identifier for items.
pub type ItemId = Uuid;

/// How a stroke combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    /// Composite the stroke color over the destination.
    Color,
    /// Clear destination pixels under the stroke to full transparency.
    Clear,
}

/// Everything a surface needs to stroke one path.
#[derive(Debug, Clone, Copy)]
pub struct StrokePaint {
    pub color: Color,
    pub width: f64,
    pub mode: PaintMode,
}

/// A raster target items can draw themselves onto.
///
/// Paths are always stroked with round caps and joins. `transform` maps item
/// coordinates into the surface's own coordinate space.
pub trait Surface {
    fn stroke_path(&mut self, path: &BezPath, paint: &StrokePaint, transform: Affine);
}

/// Capabilities shared by every item.
pub trait ItemTrait {
    /// Get the unique identifier.
    fn id(&self) -> ItemId;

    /// Get the unrotated bounding box in canvas coordinates.
    fn bounds(&self) -> Rect;

    /// Move the whole item.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Reshape while drafting. Strokes append `current`; shapes span
    /// `anchor` and `current`.
    fn update_geometry(&mut self, anchor: Point, current: Point);

    /// Outline to stroke, in item coordinates.
    fn to_path(&self) -> BezPath;

    /// Transform applied to [`ItemTrait::to_path`] at paint time.
    fn paint_transform(&self) -> Affine {
        Affine::IDENTITY
    }

    /// Get the style.
    fn style(&self) -> &ItemStyle;

    /// Paint used for this item's outline.
    fn paint(&self) -> StrokePaint {
        StrokePaint {
            color: self.style().stroke(),
            width: self.style().stroke_width,
            mode: PaintMode::Color,
        }
    }

    /// Draw onto a surface.
    fn draw(&self, surface: &mut dyn Surface) {
        surface.stroke_path(&self.to_path(), &self.paint(), self.paint_transform());
    }
}

/// Extra capabilities of rectangle-framed shapes.
pub trait ParametricShape: ItemTrait {
    fn frame(&self) -> &Frame;

    fn frame_mut(&mut self) -> &mut Frame;

    /// Recompute the rectangle from a remembered original, scaled about the
    /// original's center. Repeated calls with the same inputs converge.
    fn scale_from_original_bounds(&mut self, original: Rect, factor: f64) {
        self.frame_mut().scale_from(original, factor);
    }

    /// Add `delta` radians to the paint-time rotation.
    fn apply_rotation(&mut self, delta: f64) {
        self.frame_mut().rotation += delta;
    }

    fn rotation(&self) -> f64 {
        self.frame().rotation
    }

    fn set_rotation(&mut self, rotation: f64) {
        self.frame_mut().rotation = rotation;
    }
}

/// Closed set of annotation items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Stroke(Stroke),
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Arrow(Arrow),
    Check(Check),
    Cross(Cross),
}

impl Item {
    fn as_trait(&self) -> &dyn ItemTrait {
        match self {
            Item::Stroke(s) => s,
            Item::Rectangle(s) => s,
            Item::Ellipse(s) => s,
            Item::Arrow(s) => s,
            Item::Check(s) => s,
            Item::Cross(s) => s,
        }
    }

    fn as_trait_mut(&mut self) -> &mut dyn ItemTrait {
        match self {
            Item::Stroke(s) => s,
            Item::Rectangle(s) => s,
            Item::Ellipse(s) => s,
            Item::Arrow(s) => s,
            Item::Check(s) => s,
            Item::Cross(s) => s,
        }
    }

    pub fn id(&self) -> ItemId {
        self.as_trait().id()
    }

    pub fn bounds(&self) -> Rect {
        self.as_trait().bounds()
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.as_trait_mut().translate(dx, dy);
    }

    pub fn update_geometry(&mut self, anchor: Point, current: Point) {
        self.as_trait_mut().update_geometry(anchor, current);
    }

    pub fn to_path(&self) -> BezPath {
        self.as_trait().to_path()
    }

    pub fn style(&self) -> &ItemStyle {
        self.as_trait().style()
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        self.as_trait().draw(surface);
    }

    /// Check whether `point` lies inside the bounds inflated by `tolerance`.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.bounds().inflate(tolerance, tolerance).contains(point)
    }

    /// Check if this item is a free-hand stroke.
    pub fn is_stroke(&self) -> bool {
        matches!(self, Item::Stroke(_))
    }

    /// Get the parametric capabilities, `None` for strokes.
    pub fn as_parametric(&self) -> Option<&dyn ParametricShape> {
        match self {
            Item::Stroke(_) => None,
            Item::Rectangle(s) => Some(s),
            Item::Ellipse(s) => Some(s),
            Item::Arrow(s) => Some(s),
            Item::Check(s) => Some(s),
            Item::Cross(s) => Some(s),
        }
    }

    /// Get the mutable parametric capabilities, `None` for strokes.
    pub fn as_parametric_mut(&mut self) -> Option<&mut dyn ParametricShape> {
        match self {
            Item::Stroke(_) => None,
            Item::Rectangle(s) => Some(s),
            Item::Ellipse(s) => Some(s),
            Item::Arrow(s) => Some(s),
            Item::Check(s) => Some(s),
            Item::Cross(s) => Some(s),
        }
    }

    /// Rotation in radians (0 for strokes).
    pub fn rotation(&self) -> f64 {
        self.as_parametric().map_or(0.0, |s| s.rotation())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Surface that records every stroke call.
    #[derive(Default)]
    pub struct RecordingSurface {
        pub calls: Vec<(BezPath, StrokePaint, Affine)>,
    }

    impl Surface for RecordingSurface {
        fn stroke_path(&mut self, path: &BezPath, paint: &StrokePaint, transform: Affine) {
            self.calls.push((path.clone(), *paint, transform));
        }
    }
}
