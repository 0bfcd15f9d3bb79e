//! Ordered collection of committed items.

use crate::shapes::{Item, ItemId};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Committed items in z-order (back to front).
///
/// Nothing in here reorders existing entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStore {
    items: Vec<Item>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item on top of everything else.
    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Remove an item by ID, keeping the order of the rest.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Get an item by ID.
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Get a mutable reference to an item by ID.
    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Topmost item whose bounds, inflated by `tolerance`, contain `point`.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<ItemId> {
        self.items
            .iter()
            .rev()
            .find(|item| item.hit_test(point, tolerance))
            .map(Item::id)
    }

    /// Items in z-order (back to front).
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
