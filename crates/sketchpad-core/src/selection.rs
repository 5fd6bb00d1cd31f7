//! Transient selection set.

use crate::shapes::ShapeId;

/// Selected shape ids in the order they were selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ShapeId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ShapeId] {
        &self.ids
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Add `id`; returns false if it was already selected
    pub fn insert(&mut self, id: ShapeId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    pub fn remove(&mut self, id: ShapeId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| *s != id);
        self.ids.len() != before
    }

    /// Flip membership of `id`
    pub fn toggle(&mut self, id: ShapeId) {
        if !self.remove(id) {
            self.ids.push(id);
        }
    }

    /// Replace the selection with exactly `ids`
    pub fn set(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        self.ids.clear();
        for id in ids {
            self.insert(id);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
