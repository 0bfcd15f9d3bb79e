//! Canvas document and host-facing engine state.

use crate::config::EngineConfig;
use crate::gesture::{GestureMachine, GestureState};
use crate::history::History;
use crate::input::TouchEvent;
use crate::shapes::{Item, ItemId, SerializableColor};
use crate::store::AnnotationStore;
use crate::tools::{ToolKind, ToolManager};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Committed annotations plus their undo/redo history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanvasDocument {
    store: AnnotationStore,
    #[serde(skip)]
    history: History,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to the store. Clears redo.
    pub fn commit(&mut self, item: Item) {
        let id = item.id();
        self.store.push(item);
        self.history.record_commit(id);
        log::debug!("Committed item {id} ({} total)", self.store.len());
    }

    /// Move the most recently committed item into redo.
    /// Returns its id, or `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<ItemId> {
        while let Some(id) = self.history.pop_undo() {
            if let Some(item) = self.store.remove(id) {
                self.history.push_redo(item);
                log::debug!("Undo removed item {id}");
                return Some(id);
            }
        }
        None
    }

    /// Re-append the most recently undone item.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.pop_redo() {
            Some(item) => {
                log::debug!("Redo restored item {}", item.id());
                self.store.push(item);
                true
            }
            None => false,
        }
    }

    /// Empty the store and both history stacks.
    pub fn clear(&mut self) {
        self.store.clear();
        self.history.clear();
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Committed items in z-order (back to front).
    pub fn items(&self) -> &[Item] {
        self.store.as_slice()
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.store.get_mut(id)
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Serialize the committed items to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load committed items from JSON. Every loaded item is undoable.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let store: AnnotationStore = serde_json::from_str::<Self>(json)?.store;
        let mut history = History::new();
        for item in store.iter() {
            history.record_commit(item.id());
        }
        Ok(Self { store, history })
    }
}

/// Runtime engine state owned by the host.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The document being edited.
    pub document: CanvasDocument,
    /// Tool manager.
    pub tool_manager: ToolManager,
    gestures: GestureMachine,
    /// Last known size of the live canvas.
    canvas_size: Size,
    config: EngineConfig,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with an empty document.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            document: CanvasDocument::new(),
            tool_manager: ToolManager::with_style(config.default_style.clone()),
            gestures: GestureMachine::new(config.hit_tolerance),
            canvas_size: Size::ZERO,
            config,
        }
    }

    /// Create a canvas with an existing document.
    pub fn with_document(document: CanvasDocument, config: EngineConfig) -> Self {
        Self {
            document,
            ..Self::with_config(config)
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Feed one touch sample. Returns whether a repaint is needed.
    pub fn handle_touch(&mut self, event: TouchEvent) -> bool {
        log::trace!("Touch {:?} pointer {} at {:?}", event.phase, event.pointer, event.position);
        self.gestures
            .handle(event, &mut self.document, &self.tool_manager)
    }

    /// Returns true if an item was undone.
    pub fn undo(&mut self) -> bool {
        self.document.undo().is_some()
    }

    /// Returns true if an item was redone.
    pub fn redo(&mut self) -> bool {
        self.document.redo()
    }

    /// Remove every item and all history, aborting any active gesture.
    pub fn clear(&mut self) {
        self.gestures.cancel();
        self.document.clear();
    }

    pub fn can_undo(&self) -> bool {
        self.document.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.document.can_redo()
    }

    /// Set the current tool. The in-progress item is unaffected.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool_manager.set_tool(tool);
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.tool_manager.set_color(color);
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.tool_manager.set_stroke_width(width);
    }

    /// Record the live canvas size used to map items onto the source image.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_size = Size::new(width, height);
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    /// Abort the active gesture, discarding any provisional shape.
    pub fn cancel_session(&mut self) -> bool {
        self.gestures.cancel()
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gestures.state()
    }

    /// The shape being drafted, drawn on top of committed items.
    pub fn provisional(&self) -> Option<&Item> {
        self.gestures.provisional()
    }

    /// Committed items in z-order (back to front).
    pub fn items(&self) -> &[Item] {
        self.document.items()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ItemStyle, Rectangle, Stroke};
    use kurbo::{Point, Rect};

    fn stroke_at(x: f64) -> Item {
        Item::Stroke(Stroke::from_points(
            vec![Point::new(x, 0.0), Point::new(x, 10.0)],
            ItemStyle::default(),
            false,
        ))
    }

    fn ids(doc: &CanvasDocument) -> Vec<ItemId> {
        doc.items().iter().map(Item::id).collect()
    }

    #[test]
    fn test_document_creation() {
        let doc = CanvasDocument::new();
        assert!(doc.is_empty());
        assert!(!doc.can_undo());
        assert!(!doc.can_redo());
    }

    #[test]
    fn test_undo_then_redo_restores_sequence() {
        let mut doc = CanvasDocument::new();
        for x in [0.0, 10.0, 20.0] {
            doc.commit(stroke_at(x));
        }
        let before = doc.items().to_vec();

        assert!(doc.undo().is_some());
        assert!(doc.undo().is_some());
        assert_eq!(doc.len(), 1);
        assert!(doc.redo());
        assert!(doc.redo());

        assert_eq!(doc.items(), before.as_slice());
        assert!(!doc.redo());
    }

    #[test]
    fn test_undo_returns_last_committed() {
        let mut doc = CanvasDocument::new();
        let first = stroke_at(0.0);
        let second = stroke_at(5.0);
        let (first_id, second_id) = (first.id(), second.id());
        doc.commit(first);
        doc.commit(second);

        assert_eq!(doc.undo(), Some(second_id));
        assert_eq!(ids(&doc), vec![first_id]);
    }

    #[test]
    fn test_commit_after_undo_clears_redo() {
        let mut doc = CanvasDocument::new();
        doc.commit(stroke_at(0.0));
        doc.undo();
        assert!(doc.can_redo());

        doc.commit(stroke_at(1.0));
        assert!(!doc.can_redo());
        assert!(!doc.redo());
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_empty_undo_redo_are_noops() {
        let mut doc = CanvasDocument::new();
        assert_eq!(doc.undo(), None);
        assert!(!doc.redo());
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut doc = CanvasDocument::new();
        doc.commit(stroke_at(0.0));
        doc.commit(stroke_at(1.0));
        doc.undo();
        doc.clear();
        assert!(doc.is_empty());
        assert!(!doc.can_undo());
        assert!(!doc.can_redo());
    }

    #[test]
    fn test_json_roundtrip_keeps_items_undoable() {
        let mut doc = CanvasDocument::new();
        doc.commit(stroke_at(0.0));
        doc.commit(Item::Rectangle(Rectangle::new(
            Rect::new(1.0, 2.0, 3.0, 4.0),
            ItemStyle::default(),
        )));

        let json = doc.to_json().unwrap();
        let mut loaded = CanvasDocument::from_json(&json).unwrap();
        assert_eq!(loaded.items(), doc.items());
        assert!(loaded.undo().is_some());
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_canvas_touch_and_history() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Rectangle);
        assert!(canvas.handle_touch(TouchEvent::down(1, 10.0, 10.0)));
        canvas.handle_touch(TouchEvent::moved(1, 50.0, 80.0));
        assert!(canvas.provisional().is_some());
        assert!(!canvas.can_undo());
        canvas.handle_touch(TouchEvent::up(1, 50.0, 80.0));

        assert_eq!(canvas.items().len(), 1);
        assert_eq!(canvas.items()[0].bounds(), Rect::new(10.0, 10.0, 50.0, 80.0));
        assert!(canvas.undo());
        assert!(!canvas.undo());
        assert!(canvas.redo());
        assert_eq!(canvas.gesture_state(), GestureState::Idle);
    }

    #[test]
    fn test_drafting_direction_is_irrelevant() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Rectangle);
        canvas.handle_touch(TouchEvent::down(1, 50.0, 80.0));
        canvas.handle_touch(TouchEvent::moved(1, 10.0, 10.0));
        canvas.handle_touch(TouchEvent::up(1, 10.0, 10.0));
        assert_eq!(canvas.items()[0].bounds(), Rect::new(10.0, 10.0, 50.0, 80.0));
    }

    #[test]
    fn test_style_change_mid_stroke_keeps_item_style() {
        let mut canvas = Canvas::new();
        canvas.handle_touch(TouchEvent::down(1, 0.0, 0.0));
        canvas.set_color(SerializableColor::red());
        canvas.set_stroke_width(12.0);
        canvas.handle_touch(TouchEvent::moved(1, 5.0, 5.0));
        canvas.handle_touch(TouchEvent::up(1, 5.0, 5.0));

        assert_eq!(canvas.items()[0].style(), &ItemStyle::default());
        assert_eq!(
            canvas.tool_manager.current_style,
            ItemStyle::new(SerializableColor::red(), 12.0)
        );
    }

    #[test]
    fn test_config_seeds_style_and_tolerance() {
        let config = EngineConfig {
            hit_tolerance: 0.0,
            default_style: ItemStyle::new(SerializableColor::red(), 2.0),
            ..EngineConfig::default()
        };
        let mut canvas = Canvas::with_config(config);
        canvas.document.commit(Item::Rectangle(Rectangle::new(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            ItemStyle::default(),
        )));
        canvas.set_tool(ToolKind::Cross);

        canvas.handle_touch(TouchEvent::down(1, 12.0, 5.0));
        assert_eq!(canvas.gesture_state(), GestureState::Drafting);
        assert_eq!(
            canvas.provisional().map(|item| item.style().clone()),
            Some(ItemStyle::new(SerializableColor::red(), 2.0))
        );
    }

    #[test]
    fn test_cancel_session_and_canvas_size() {
        let mut canvas = Canvas::new();
        assert_eq!(canvas.canvas_size(), Size::ZERO);
        canvas.set_canvas_size(400.0, 300.0);
        assert_eq!(canvas.canvas_size(), Size::new(400.0, 300.0));

        canvas.set_tool(ToolKind::Ellipse);
        canvas.handle_touch(TouchEvent::down(1, 0.0, 0.0));
        assert!(canvas.cancel_session());
        assert!(canvas.provisional().is_none());
        assert!(canvas.items().is_empty());
    }

    #[test]
    fn test_clear_during_stroke() {
        let mut canvas = Canvas::new();
        canvas.handle_touch(TouchEvent::down(1, 0.0, 0.0));
        canvas.clear();
        assert!(!canvas.handle_touch(TouchEvent::moved(1, 5.0, 5.0)));
        assert!(canvas.items().is_empty());
    }
}
