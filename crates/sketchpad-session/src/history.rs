//! Linear undo/redo over serialized whole-document snapshots.
//!
//! The snapshot at `position` always equals the live document's serialized
//! form after a commit, undo or redo. Committing from the middle of the list
//! discards everything after `position`; once the list exceeds its cap the
//! oldest snapshot is evicted.

use std::collections::VecDeque;

use anyhow::{Context, Result};
use tracing::debug;

use sketchpad_core::Document;

/// Maximum number of snapshots kept
pub const DEFAULT_HISTORY_CAP: usize = 60;

/// Manages undo/redo with document snapshots
#[derive(Debug, Clone)]
pub struct History {
    /// Serialized documents, oldest first
    snapshots: VecDeque<String>,
    /// Index of the snapshot matching the live document
    position: usize,
    cap: usize,
}

impl History {
    /// Start a history whose first entry is `initial`
    pub fn new(initial: &Document, cap: usize) -> Result<Self> {
        let mut snapshots = VecDeque::with_capacity(cap.min(DEFAULT_HISTORY_CAP));
        snapshots.push_back(serialize(initial)?);
        Ok(Self {
            snapshots,
            position: 0,
            cap: cap.max(1),
        })
    }

    /// Record the document after a committed mutation
    pub fn commit(&mut self, doc: &Document) -> Result<()> {
        let snapshot = serialize(doc)?;
        self.snapshots.truncate(self.position + 1);
        self.snapshots.push_back(snapshot);
        self.position = self.snapshots.len() - 1;

        while self.snapshots.len() > self.cap {
            self.snapshots.pop_front();
            self.position -= 1;
        }
        debug!(position = self.position, len = self.snapshots.len(), "history commit");
        Ok(())
    }

    /// Step back; `Ok(None)` when already at the oldest entry
    pub fn undo(&mut self) -> Result<Option<Document>> {
        if self.position == 0 {
            return Ok(None);
        }
        let doc = self.restore(self.position - 1)?;
        self.position -= 1;
        Ok(Some(doc))
    }

    /// Step forward; `Ok(None)` when already at the newest entry
    pub fn redo(&mut self) -> Result<Option<Document>> {
        if self.position + 1 >= self.snapshots.len() {
            return Ok(None);
        }
        let doc = self.restore(self.position + 1)?;
        self.position += 1;
        Ok(Some(doc))
    }

    /// Forget everything and start over from `doc`
    pub fn reset(&mut self, doc: &Document) -> Result<()> {
        let snapshot = serialize(doc)?;
        self.snapshots.clear();
        self.snapshots.push_back(snapshot);
        self.position = 0;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.position > 0
    }

    pub fn can_redo(&self) -> bool {
        self.position + 1 < self.snapshots.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Serialized form at the current position
    pub fn current(&self) -> Option<&str> {
        self.snapshots.get(self.position).map(String::as_str)
    }

    fn restore(&self, index: usize) -> Result<Document> {
        let snapshot = self
            .snapshots
            .get(index)
            .with_context(|| format!("no history entry at {index}"))?;
        serde_json::from_str(snapshot).with_context(|| format!("failed to restore history entry {index}"))
    }
}

fn serialize(doc: &Document) -> Result<String> {
    serde_json::to_string(doc).context("failed to serialize document snapshot")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(width: u32) -> Document {
        Document::new(width, 100)
    }

    #[test]
    fn undo_and_redo_walk_the_list() {
        let mut history = History::new(&doc(1), 60).unwrap();
        history.commit(&doc(2)).unwrap();
        history.commit(&doc(3)).unwrap();

        assert_eq!(history.undo().unwrap().unwrap().width, 2);
        assert_eq!(history.undo().unwrap().unwrap().width, 1);
        assert!(history.undo().unwrap().is_none());
        assert_eq!(history.redo().unwrap().unwrap().width, 2);
        assert_eq!(history.redo().unwrap().unwrap().width, 3);
        assert!(history.redo().unwrap().is_none());
    }

    #[test]
    fn commit_from_the_middle_truncates_the_future() {
        let mut history = History::new(&doc(1), 60).unwrap();
        history.commit(&doc(2)).unwrap();
        history.commit(&doc(3)).unwrap();
        history.undo().unwrap();
        history.commit(&doc(4)).unwrap();

        assert_eq!(history.len(), 3);
        assert!(!history.can_redo());
        assert_eq!(history.undo().unwrap().unwrap().width, 2);
    }

    #[test]
    fn cap_evicts_the_oldest_entry() {
        let mut history = History::new(&doc(0), 60).unwrap();
        for i in 1..=100 {
            history.commit(&doc(i)).unwrap();
        }
        assert_eq!(history.len(), 60);
        assert_eq!(history.position(), 59);

        let mut oldest = 100;
        while let Some(d) = history.undo().unwrap() {
            oldest = d.width;
        }
        assert_eq!(oldest, 41);
    }

    #[test]
    fn current_matches_last_commit() {
        let mut history = History::new(&doc(1), 60).unwrap();
        let d = doc(7);
        history.commit(&d).unwrap();
        assert_eq!(history.current().unwrap(), serde_json::to_string(&d).unwrap());
    }
}
