//! Tool selection and item creation.

use crate::shapes::{
    Arrow, Check, Cross, Ellipse, Frame, Item, ItemStyle, Rectangle, SerializableColor, Stroke,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Stroke,
    Erase,
    Arrow,
    Ellipse,
    Rectangle,
    Check,
    Cross,
}

impl ToolKind {
    /// Free-hand tools always draw; the others double as move/transform
    /// tools for existing items.
    pub fn is_freehand(self) -> bool {
        matches!(self, ToolKind::Stroke | ToolKind::Erase)
    }

    /// Whether touching an existing item selects it instead of creating one.
    pub fn selects_items(self) -> bool {
        !self.is_freehand()
    }
}

/// Manages the current tool and the style new items are created with.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current style to apply to new items.
    pub current_style: ItemStyle,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tool manager starting from a given style.
    pub fn with_style(style: ItemStyle) -> Self {
        Self {
            current_tool: ToolKind::default(),
            current_style: style,
        }
    }

    /// Set the current tool.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.current_style.stroke_color = color;
    }

    /// Set the stroke width; non-finite or non-positive widths are ignored.
    pub fn set_stroke_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.current_style.stroke_width = width;
        }
    }

    /// Create the item `tool` starts at `anchor`, using the current style.
    ///
    /// Strokes start with the anchor as their first point; shapes start as a
    /// zero-sized frame at the anchor.
    pub fn create_item(&self, tool: ToolKind, anchor: Point) -> Item {
        let style = self.current_style.clone();
        let rect = Frame::at(anchor).rect;
        match tool {
            ToolKind::Stroke | ToolKind::Erase => Item::Stroke(Stroke::from_points(
                vec![anchor],
                style,
                tool == ToolKind::Erase,
            )),
            ToolKind::Arrow => Item::Arrow(Arrow::new(rect, style)),
            ToolKind::Ellipse => Item::Ellipse(Ellipse::new(rect, style)),
            ToolKind::Rectangle => Item::Rectangle(Rectangle::new(rect, style)),
            ToolKind::Check => Item::Check(Check::new(rect, style)),
            ToolKind::Cross => Item::Cross(Cross::new(rect, style)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    #[test]
    fn test_tool_selection() {
        let mut tm = ToolManager::new();
        assert_eq!(tm.current_tool, ToolKind::Stroke);

        tm.set_tool(ToolKind::Rectangle);
        assert_eq!(tm.current_tool, ToolKind::Rectangle);
    }

    #[test]
    fn test_freehand_tools_do_not_select() {
        assert!(!ToolKind::Stroke.selects_items());
        assert!(!ToolKind::Erase.selects_items());
        for tool in [
            ToolKind::Arrow,
            ToolKind::Ellipse,
            ToolKind::Rectangle,
            ToolKind::Check,
            ToolKind::Cross,
        ] {
            assert!(tool.selects_items());
        }
    }

    #[test]
    fn test_create_item_kinds() {
        let mut tm = ToolManager::new();
        tm.set_stroke_width(7.0);
        let anchor = Point::new(5.0, 6.0);

        match tm.create_item(ToolKind::Erase, anchor) {
            Item::Stroke(stroke) => {
                assert!(stroke.erase);
                assert_eq!(stroke.points(), &[anchor]);
                assert!((stroke.style.stroke_width - 7.0).abs() < f64::EPSILON);
            }
            other => panic!("expected stroke, got {other:?}"),
        }

        let ellipse = tm.create_item(ToolKind::Ellipse, anchor);
        assert!(matches!(ellipse, Item::Ellipse(_)));
        assert_eq!(ellipse.bounds(), Rect::new(5.0, 6.0, 5.0, 6.0));
    }

    #[test]
    fn test_invalid_width_ignored() {
        let mut tm = ToolManager::new();
        let before = tm.current_style.stroke_width;
        tm.set_stroke_width(0.0);
        tm.set_stroke_width(f64::NAN);
        assert!((tm.current_style.stroke_width - before).abs() < f64::EPSILON);
    }
}
