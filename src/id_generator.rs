use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity handle of a shape.
///
/// Ids are never persisted: a shape rebuilt from JSON (import, undo, redo)
/// receives a fresh one, so stale handles held by a selection can never
/// resolve to a shape of the restored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn generate_id() -> ShapeId {
    ShapeId::new()
}
