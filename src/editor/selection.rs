use crate::document::Page;
use crate::id_generator::ShapeId;

/// Either one shape or a group of shapes, never both.
///
/// Only ids are held; they are resolved against the current page on use.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Single(ShapeId),
    Multi(Vec<ShapeId>),
}

impl Selection {
    pub fn from_ids(ids: Vec<ShapeId>) -> Self {
        if ids.is_empty() { Selection::None } else { Selection::Multi(ids) }
    }

    pub fn single(&self) -> Option<ShapeId> {
        match self {
            Selection::Single(id) => Some(*id),
            _ => None,
        }
    }

    pub fn multi(&self) -> &[ShapeId] {
        match self {
            Selection::Multi(ids) => ids,
            _ => &[],
        }
    }

    /// Every selected id, single or grouped.
    pub fn ids(&self) -> Vec<ShapeId> {
        match self {
            Selection::None => Vec::new(),
            Selection::Single(id) => vec![*id],
            Selection::Multi(ids) => ids.clone(),
        }
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        match self {
            Selection::None => false,
            Selection::Single(selected) => *selected == id,
            Selection::Multi(ids) => ids.contains(&id),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }

    /// Drops ids that no longer exist on `page`.
    pub fn retain_existing(&mut self, page: &Page) {
        match self {
            Selection::Single(id) if page.get(*id).is_none() => self.clear(),
            Selection::Multi(ids) => {
                ids.retain(|id| page.get(*id).is_some());
                if ids.is_empty() {
                    self.clear();
                }
            }
            _ => {}
        }
    }
}
