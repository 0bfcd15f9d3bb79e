//! Undo/redo history.

use crate::shapes::{Item, ItemId};

/// Linear undo history, kept apart from the store it describes.
///
/// The undo stack records committed item ids in commit order; the redo stack
/// owns the items undo took out of the store.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<ItemId>,
    redo_stack: Vec<Item>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh commit. New work invalidates redo.
    pub fn record_commit(&mut self, id: ItemId) {
        self.undo_stack.push(id);
        self.redo_stack.clear();
    }

    /// Id of the item the next undo removes.
    pub fn pop_undo(&mut self) -> Option<ItemId> {
        self.undo_stack.pop()
    }

    pub fn push_redo(&mut self, item: Item) {
        self.redo_stack.push(item);
    }

    /// Take the next item to redo, recording it as undoable again.
    pub fn pop_redo(&mut self) -> Option<Item> {
        let item = self.redo_stack.pop()?;
        self.undo_stack.push(item.id());
        Some(item)
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}
