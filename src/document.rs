use serde::{Deserialize, Serialize};

use crate::id_generator::ShapeId;
use crate::shape::Shape;

/// Background of the first page of a fresh document.
pub const FIRST_PAGE_BG: &str = "#FFECD1";
/// Background of pages appended by navigation or substituted on import.
pub const DEFAULT_PAGE_BG: &str = "#ffffff";

fn default_bg() -> String {
    DEFAULT_PAGE_BG.to_owned()
}

/// One canvas: a background color and its shapes, back to front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "bgColor", default = "default_bg")]
    pub bg_color: String,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl Default for Page {
    fn default() -> Self {
        Self::blank()
    }
}

impl Page {
    pub fn new(bg_color: impl Into<String>) -> Self {
        Self { bg_color: bg_color.into(), shapes: Vec::new() }
    }

    pub fn blank() -> Self {
        Self::new(DEFAULT_PAGE_BG)
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.shapes.push(shape);
        id
    }

    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        Some(self.shapes.remove(index))
    }

    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|shape| shape.id() == id)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|shape| shape.id() == id)
    }

    /// Moves the shape to the end of the list. Returns whether the order changed.
    pub fn bring_to_front(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.shapes.len() => {
                let shape = self.shapes.remove(index);
                self.shapes.push(shape);
                true
            }
            _ => false,
        }
    }

    /// Moves the shape to the start of the list. Returns whether the order changed.
    pub fn send_to_back(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => {
                let shape = self.shapes.remove(index);
                self.shapes.insert(0, shape);
                true
            }
            _ => false,
        }
    }

    /// Swaps the shape with the one above it.
    pub fn move_up(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(index) if index + 1 < self.shapes.len() => {
                self.shapes.swap(index, index + 1);
                true
            }
            _ => false,
        }
    }

    /// Swaps the shape with the one below it.
    pub fn move_down(&mut self, id: ShapeId) -> bool {
        match self.index_of(id) {
            Some(index) if index > 0 => {
                self.shapes.swap(index, index - 1);
                true
            }
            _ => false,
        }
    }
}

/// Ordered pages plus the index of the one being edited.
///
/// There is always at least one page, and the current page is always
/// resolved through the index.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pages: Vec<Page>,
    current_page_index: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            pages: vec![Page::new(FIRST_PAGE_BG)],
            current_page_index: 0,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn current_page_index(&self) -> usize {
        self.current_page_index
    }

    pub fn current_page(&self) -> &Page {
        &self.pages[self.current_page_index]
    }

    pub fn current_page_mut(&mut self) -> &mut Page {
        &mut self.pages[self.current_page_index]
    }

    pub fn current_shapes(&self) -> &[Shape] {
        &self.current_page().shapes
    }

    /// Advances to the next page, appending a blank one past the end.
    pub fn next_page(&mut self) {
        if self.current_page_index + 1 >= self.pages.len() {
            self.pages.push(Page::blank());
            log::debug!("Appended page {}", self.pages.len());
        }
        self.current_page_index += 1;
    }

    /// Goes back one page. Returns `false` on the first page.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page_index == 0 {
            return false;
        }
        self.current_page_index -= 1;
        true
    }

    /// Jumps to an existing page. Returns `false` when out of range.
    pub fn go_to_page(&mut self, index: usize) -> bool {
        if index >= self.pages.len() {
            return false;
        }
        self.current_page_index = index;
        true
    }

    /// Replaces every page, keeping the index in range.
    pub fn replace_pages(&mut self, pages: Vec<Page>) {
        self.pages = if pages.is_empty() { vec![Page::blank()] } else { pages };
        self.current_page_index = self.current_page_index.min(self.pages.len() - 1);
    }

    pub fn set_background(&mut self, color: impl Into<String>) {
        self.current_page_mut().bg_color = color.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::factory;
    use egui::{Pos2, Vec2};

    fn page_with(n: usize) -> (Page, Vec<ShapeId>) {
        let mut page = Page::blank();
        let ids = (0..n)
            .map(|i| {
                page.add_shape(factory::create_rectangle(
                    Pos2::new(i as f32 * 10.0, 0.0),
                    Vec2::splat(5.0),
                    "#fff",
                    "#000",
                    1.0,
                ))
            })
            .collect();
        (page, ids)
    }

    fn order(page: &Page) -> Vec<ShapeId> {
        page.shapes.iter().map(|s| s.id()).collect()
    }

    #[test]
    fn test_layering_boundaries_are_noops() {
        let (mut page, ids) = page_with(3);
        assert!(!page.bring_to_front(ids[2]));
        assert!(!page.move_up(ids[2]));
        assert!(!page.send_to_back(ids[0]));
        assert!(!page.move_down(ids[0]));
        assert_eq!(order(&page), ids);
    }

    #[test]
    fn test_layering_moves() {
        let (mut page, ids) = page_with(3);
        assert!(page.bring_to_front(ids[0]));
        assert_eq!(order(&page), vec![ids[1], ids[2], ids[0]]);
        assert!(page.move_down(ids[0]));
        assert_eq!(order(&page), vec![ids[1], ids[0], ids[2]]);
        assert!(page.send_to_back(ids[2]));
        assert_eq!(order(&page), vec![ids[2], ids[1], ids[0]]);
        assert!(page.move_up(ids[2]));
        assert_eq!(order(&page), vec![ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn test_missing_id_is_noop() {
        let (mut page, _) = page_with(2);
        let stray = factory::create_text(Pos2::ZERO, "#000", 24.0).id();
        assert!(!page.bring_to_front(stray));
        assert!(page.remove_shape(stray).is_none());
    }

    #[test]
    fn test_next_page_appends_blank() {
        let mut doc = Document::new();
        assert_eq!(doc.current_page().bg_color, FIRST_PAGE_BG);
        doc.next_page();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.current_page_index(), 1);
        assert_eq!(doc.current_page().bg_color, DEFAULT_PAGE_BG);

        assert!(doc.prev_page());
        assert!(!doc.prev_page());
        doc.next_page();
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_replace_pages_clamps_index() {
        let mut doc = Document::new();
        doc.next_page();
        doc.next_page();
        doc.replace_pages(vec![Page::blank()]);
        assert_eq!(doc.current_page_index(), 0);

        doc.replace_pages(Vec::new());
        assert_eq!(doc.page_count(), 1);
    }
}
