use serde_json::Value;
use thiserror::Error;

use crate::document::Document;
use crate::persistence::{self, PersistenceError};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to capture snapshot: {0}")]
    Capture(#[source] PersistenceError),

    #[error("Failed to restore snapshot: {0}")]
    Restore(#[source] PersistenceError),
}

pub type HistoryResult<T> = Result<T, HistoryError>;

/// Structurally independent copy of every page, in the persisted encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Value);

impl Snapshot {
    pub fn capture(document: &Document) -> HistoryResult<Self> {
        persistence::pages_to_value(document.pages())
            .map(Snapshot)
            .map_err(HistoryError::Capture)
    }

    /// Rebuilds the pages into `document`. On error the document is untouched.
    fn restore_into(&self, document: &mut Document) -> HistoryResult<()> {
        let pages = persistence::pages_from_value(self.0.clone()).map_err(HistoryError::Restore)?;
        document.replace_pages(pages);
        Ok(())
    }
}

/// Undo/redo stacks of whole-document snapshots
pub struct History {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum undo depth; 0 means unbounded.
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(0)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
        }
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.enforce_limit();
    }

    /// Records the current document as an undo point and drops the redo branch.
    pub fn save_state(&mut self, document: &Document) -> HistoryResult<()> {
        let snapshot = Snapshot::capture(document)?;
        self.push(snapshot);
        Ok(())
    }

    /// Records a snapshot taken earlier, e.g. at the start of a gesture.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.redo_stack.clear();
        if self.undo_stack.last() == Some(&snapshot) {
            return;
        }
        self.undo_stack.push(snapshot);
        self.enforce_limit();
    }

    /// Steps back one snapshot. Returns `false` when there is nothing to undo.
    ///
    /// If the snapshot cannot be rebuilt, both stacks and the document stay
    /// as they were.
    pub fn undo(&mut self, document: &mut Document) -> HistoryResult<bool> {
        let Some(previous) = self.undo_stack.last() else {
            return Ok(false);
        };
        let current = Snapshot::capture(document)?;
        previous.restore_into(document)?;
        self.undo_stack.pop();
        self.redo_stack.push(current);
        log::debug!("Undo ({} left)", self.undo_stack.len());
        Ok(true)
    }

    pub fn redo(&mut self, document: &mut Document) -> HistoryResult<bool> {
        let Some(next) = self.redo_stack.last() else {
            return Ok(false);
        };
        let current = Snapshot::capture(document)?;
        next.restore_into(document)?;
        self.redo_stack.pop();
        self.undo_stack.push(current);
        self.enforce_limit();
        log::debug!("Redo ({} left)", self.redo_stack.len());
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn enforce_limit(&mut self) {
        if self.limit > 0 && self.undo_stack.len() > self.limit {
            let excess = self.undo_stack.len() - self.limit;
            self.undo_stack.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::factory;
    use egui::{Pos2, Vec2};

    fn add_rect(doc: &mut Document, x: f32) {
        doc.current_page_mut().add_shape(factory::create_rectangle(
            Pos2::new(x, 0.0),
            Vec2::splat(10.0),
            "#fff",
            "#000",
            1.0,
        ));
    }

    #[test]
    fn test_duplicate_snapshot_not_pushed() {
        let doc = Document::new();
        let mut history = History::default();
        history.save_state(&doc).unwrap();
        history.save_state(&doc).unwrap();
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut doc = Document::new();
        let mut history = History::new(2);
        for i in 0..4 {
            add_rect(&mut doc, i as f32);
            history.save_state(&doc).unwrap();
        }
        assert_eq!(history.undo_depth(), 2);

        assert!(history.undo(&mut doc).unwrap());
        assert_eq!(doc.current_shapes().len(), 4);
        assert!(history.undo(&mut doc).unwrap());
        assert_eq!(doc.current_shapes().len(), 3);
        assert!(!history.undo(&mut doc).unwrap());
    }
}
