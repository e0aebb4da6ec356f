//! Pointer-driven editing of the current page.
//!
//! The [`Editor`] owns the document, the history and the view. Pointer
//! events arrive in screen coordinates relative to the canvas origin and are
//! mapped through the [`Viewport`] before any hit-testing.

use egui::{Pos2, Rect, Vec2};

pub mod config;
pub mod interaction;
pub mod resize;
pub mod selection;
pub mod tool;
pub mod viewport;

pub use config::{EditorConfig, ShapeStyle};
pub use interaction::Interaction;
pub use selection::Selection;
pub use tool::Tool;
pub use viewport::Viewport;

use crate::document::{Document, Page};
use crate::geometry::{self, HandleHit, hit_testing};
use crate::history::{History, HistoryResult, Snapshot};
use crate::id_generator::ShapeId;
use crate::persistence::{self, PersistenceResult};
use crate::shape::image::DEFAULT_IMAGE_SIZE;
use crate::shape::{Arrow, Element, Shape, factory};
use crate::surface::{MonospaceMeasure, TextMeasure};

/// Ask the host to open its text editor for a text shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditRequest {
    pub id: ShapeId,
    /// Shape box in screen space.
    pub screen_rect: Rect,
    pub initial_text: String,
}

/// Ask the host to pick an image to place at `position` (logical).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageRequest {
    pub position: Pos2,
}

/// What the host has to do after a pointer-down.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PointerOutcome {
    #[default]
    None,
    EditText(TextEditRequest),
    PickImage(ImageRequest),
}

pub struct Editor {
    document: Document,
    history: History,
    tool: Tool,
    selection: Selection,
    interaction: Interaction,
    viewport: Viewport,
    canvas_size: Option<Vec2>,
    config: EditorConfig,
    measure: Box<dyn TextMeasure>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_document(Document::new(), config)
    }

    pub fn with_document(document: Document, config: EditorConfig) -> Self {
        Self {
            document,
            history: History::new(config.history_limit),
            tool: Tool::default(),
            selection: Selection::None,
            interaction: Interaction::Idle,
            viewport: Viewport::default(),
            canvas_size: None,
            config,
            measure: Box::new(MonospaceMeasure),
        }
    }

    /// Replaces the text measurer used for text boxes.
    pub fn set_text_measure(&mut self, measure: Box<dyn TextMeasure>) {
        self.measure = measure;
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn current_page(&self) -> &Page {
        self.document.current_page()
    }

    pub fn shapes(&self) -> &[Shape] {
        self.document.current_shapes()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.history.set_limit(config.history_limit);
        self.config = config;
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.config.style
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.config.style
    }

    pub fn set_snap_to_grid(&mut self, snap: bool) {
        self.config.snap_to_grid = snap;
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switches tool, abandoning any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            log::debug!("Tool {} -> {}", self.tool.name(), tool.name());
            self.tool = tool;
            self.cancel_interaction();
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn zoom(&self) -> f32 {
        self.viewport.zoom()
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.viewport.set_zoom(zoom);
        self.viewport.pan = self.clamped_pan(self.viewport.pan);
    }

    pub fn zoom_around(&mut self, anchor: Pos2, zoom: f32) {
        self.viewport.zoom_around(anchor, zoom);
        self.viewport.pan = self.clamped_pan(self.viewport.pan);
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.viewport.pan = self.clamped_pan(pan);
    }

    /// Size of the canvas in screen pixels; enables pan clamping.
    pub fn set_canvas_size(&mut self, size: Vec2) {
        self.canvas_size = Some(size);
    }

    pub fn screen_to_logical(&self, screen: Pos2) -> Pos2 {
        self.viewport.screen_to_logical(screen)
    }

    pub fn logical_to_screen(&self, logical: Pos2) -> Pos2 {
        self.viewport.logical_to_screen(logical)
    }

    fn clamped_pan(&self, pan: Vec2) -> Vec2 {
        match self.canvas_size {
            Some(canvas) => self.viewport.clamp_pan(pan, canvas, self.config.content_size),
            None => pan,
        }
    }

    fn snap(&self, p: Pos2) -> Pos2 {
        if self.config.snap_to_grid {
            geometry::snap_to_grid(p, self.config.grid_size)
        } else {
            p
        }
    }

    fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.document.current_page_mut().get_mut(id)
    }

    fn push_and_select(&mut self, shape: Shape) -> ShapeId {
        let id = self.document.current_page_mut().add_shape(shape);
        self.selection = Selection::Single(id);
        id
    }

    // Pointer input

    pub fn pointer_down(&mut self, screen: Pos2) -> PointerOutcome {
        self.interaction = Interaction::Idle;
        let p = self.screen_to_logical(screen);

        match self.tool {
            Tool::Hand => {
                self.interaction = Interaction::Panning { start: screen, initial_pan: self.viewport.pan };
            }
            Tool::Select => self.select_down(p),
            Tool::Pencil => {
                self.interaction = Interaction::DrawingFreehand { points: vec![p] };
            }
            Tool::Rectangle | Tool::Ellipse => {
                let style = &self.config.style;
                let shape = if self.tool == Tool::Rectangle {
                    factory::create_rectangle(p, Vec2::ZERO, &style.fill_color, &style.stroke_color, style.stroke_width)
                } else {
                    factory::create_ellipse(p, Vec2::ZERO, &style.fill_color, &style.stroke_color, style.stroke_width)
                };
                let id = self.push_and_select(shape);
                self.interaction = Interaction::DrawingShape { id, start: p };
            }
            Tool::Arrow => {
                self.interaction = Interaction::DrawingArrow { start: p, current: p };
            }
            Tool::Text => {
                let style = &self.config.style;
                let shape = factory::create_text(self.snap(p), &style.text_color, style.font_size);
                let id = self.push_and_select(shape);
                if let Some(request) = self.text_edit_request(id) {
                    return PointerOutcome::EditText(request);
                }
            }
            Tool::Image => return PointerOutcome::PickImage(ImageRequest { position: p }),
            Tool::Eraser => {
                self.interaction = Interaction::Erasing;
                self.erase_at(p);
            }
        }
        PointerOutcome::None
    }

    fn select_down(&mut self, p: Pos2) {
        let zoom = self.viewport.zoom();
        if let Some(id) = self.selection.single() {
            let hit = self.current_page().get(id).and_then(|shape| {
                hit_testing::hit_handle(
                    &shape.element,
                    p,
                    self.config.corner_tolerance / zoom,
                    self.config.rotate_tolerance / zoom,
                )
            });
            match hit {
                Some(HandleHit::Corner(corner)) => {
                    self.interaction = Interaction::Resizing { id, corner };
                    return;
                }
                Some(HandleHit::Rotate) => {
                    self.interaction = Interaction::Rotating { id };
                    return;
                }
                None => {}
            }
        }

        let page = self.document.current_page();
        let Some(index) = hit_testing::topmost_hit(page.shapes(), p) else {
            self.selection.clear();
            self.interaction = Interaction::MarqueeSelecting { anchor: p, current: p };
            return;
        };

        // Only the shape on top decides whether the group is grabbed.
        let shape = &page.shapes()[index];
        let id = shape.id();
        if self.selection.multi().contains(&id) {
            let offsets = self
                .selection
                .multi()
                .iter()
                .filter_map(|id| page.get(*id))
                .map(|shape| (shape.id(), p - shape.element.center()))
                .collect();
            self.interaction = Interaction::GroupMoving { offsets };
        } else {
            let offset = p - shape.element.center();
            self.selection = Selection::Single(id);
            self.interaction = Interaction::MovingSingle { id, offset };
        }
    }

    pub fn pointer_move(&mut self, screen: Pos2) {
        let p = self.screen_to_logical(screen);
        let mut interaction = std::mem::take(&mut self.interaction);

        match &mut interaction {
            Interaction::Idle => {}
            Interaction::Panning { start, initial_pan } => {
                self.viewport.pan = self.clamped_pan(*initial_pan + (screen - *start));
            }
            Interaction::MarqueeSelecting { current, .. } => *current = p,
            Interaction::GroupMoving { offsets } => {
                let page = self.document.current_page_mut();
                for (id, offset) in offsets.iter() {
                    if let Some(shape) = page.get_mut(*id) {
                        shape.element.set_center(p - *offset);
                    }
                }
            }
            Interaction::Resizing { id, corner } => {
                let (id, corner) = (*id, *corner);
                let page = self.document.current_page_mut();
                if let Some(shape) = page.get_mut(id) {
                    resize::resize_to_pointer(&mut shape.element, corner, p, self.measure.as_ref());
                }
            }
            Interaction::Rotating { id } => {
                if let Some(shape) = self.shape_mut(*id) {
                    let delta = p - shape.element.center();
                    shape.element.set_angle(delta.y.atan2(delta.x));
                }
            }
            Interaction::MovingSingle { id, offset } => {
                let center = self.snap(p - *offset);
                if let Some(shape) = self.shape_mut(*id) {
                    let delta = center - shape.element.center();
                    shape.element.translate(delta);
                }
            }
            Interaction::DrawingFreehand { points } => points.push(p),
            Interaction::DrawingShape { id, start } => {
                let center = self.snap(start.lerp(p, 0.5));
                let size = (p - *start).abs();
                if let Some(shape) = self.shape_mut(*id) {
                    shape.element.set_center(center);
                    shape.element.set_size(size);
                }
            }
            Interaction::DrawingArrow { current, .. } => *current = p,
            Interaction::Erasing => {
                self.erase_at(p);
            }
        }

        self.interaction = interaction;
    }

    pub fn pointer_up(&mut self, screen: Pos2) {
        let p = self.screen_to_logical(screen);
        let interaction = std::mem::take(&mut self.interaction);

        match interaction {
            Interaction::MarqueeSelecting { anchor, .. } => {
                let marquee = geometry::normalized_rect(anchor, p);
                let ids = self
                    .shapes()
                    .iter()
                    .filter(|shape| hit_testing::inside_marquee(&shape.element, marquee))
                    .map(Shape::id)
                    .collect();
                self.selection = Selection::from_ids(ids);
                log::debug!("Marquee selected {} shape(s)", self.selection.multi().len());
            }
            Interaction::DrawingFreehand { mut points } => {
                points.push(p);
                points.dedup();
                if points.len() >= 2 {
                    let style = &self.config.style;
                    let snap = |c: Pos2| self.snap(c);
                    if let Some(path) = factory::create_path(&points, snap, &style.stroke_color, style.stroke_width) {
                        self.push_and_select(path);
                    }
                }
            }
            Interaction::DrawingShape { id, .. } => {
                let degenerate = self.current_page().get(id).is_some_and(|s| s.element.size() == Vec2::ZERO);
                if degenerate {
                    self.document.current_page_mut().remove_shape(id);
                    self.selection.clear();
                }
            }
            Interaction::DrawingArrow { start, .. } => {
                if start != p {
                    let style = &self.config.style;
                    let arrow = factory::create_arrow_from_points(start, p, &style.stroke_color, style.stroke_width);
                    self.push_and_select(arrow);
                }
            }
            _ => {}
        }

        if self.tool == Tool::Text {
            if let Some(id) = self.selection.single() {
                if let Some(text) = self.shape_mut(id).and_then(|s| s.element.as_text_mut()) {
                    text.apply_min_size();
                }
            }
        }

        if self.tool.is_creation() && self.config.auto_revert_to_select {
            self.tool = Tool::Select;
        }
    }

    /// Select-tool double click: edit the text shape under the pointer.
    pub fn double_click(&mut self, screen: Pos2) -> Option<TextEditRequest> {
        if self.tool != Tool::Select {
            return None;
        }
        let p = self.screen_to_logical(screen);
        let shapes = self.shapes();
        let index = hit_testing::topmost_hit(shapes, p)?;
        let shape = &shapes[index];
        shape.element.as_text()?;
        let id = shape.id();
        self.interaction = Interaction::Idle;
        self.selection = Selection::Single(id);
        self.text_edit_request(id)
    }

    pub fn cancel_interaction(&mut self) {
        if let Interaction::DrawingShape { id, .. } = self.interaction {
            let degenerate = self.current_page().get(id).is_some_and(|s| s.element.size() == Vec2::ZERO);
            if degenerate {
                self.document.current_page_mut().remove_shape(id);
                self.selection.clear();
            }
        }
        self.interaction = Interaction::Idle;
    }

    /// Throwaway arrow following the pointer while the arrow tool drags.
    pub fn arrow_preview(&self) -> Option<Arrow> {
        match &self.interaction {
            Interaction::DrawingArrow { start, current } => {
                let style = &self.config.style;
                Some(Arrow::from_points(start.x, start.y, current.x, current.y, &style.stroke_color, style.stroke_width))
            }
            _ => None,
        }
    }

    /// Points of the freehand stroke being drawn.
    pub fn freehand_preview(&self) -> Option<&[Pos2]> {
        match &self.interaction {
            Interaction::DrawingFreehand { points } => Some(points),
            _ => None,
        }
    }

    /// Normalized marquee in logical space while one is being dragged.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match &self.interaction {
            Interaction::MarqueeSelecting { anchor, current } => Some(geometry::normalized_rect(*anchor, *current)),
            _ => None,
        }
    }

    /// Removes every shape the eraser at `p` touches.
    pub fn erase_at(&mut self, p: Pos2) -> usize {
        let radius = self.config.eraser_radius;
        let page = self.document.current_page_mut();
        let before = page.shapes.len();
        page.shapes.retain(|shape| !hit_testing::eraser_touches(&shape.element, p, radius));
        let removed = before - page.shapes.len();
        if removed > 0 {
            log::debug!("Erased {removed} shape(s)");
            self.selection.retain_existing(self.document.current_page());
        }
        removed
    }

    // Text and images

    fn text_edit_request(&self, id: ShapeId) -> Option<TextEditRequest> {
        let shape = self.current_page().get(id)?;
        let text = shape.element.as_text()?;
        let bbox = shape.element.bounding_box();
        Some(TextEditRequest {
            id,
            screen_rect: Rect::from_min_max(self.logical_to_screen(bbox.min), self.logical_to_screen(bbox.max)),
            initial_text: text.text.clone(),
        })
    }

    /// Sets the text of a text shape and re-derives its box.
    pub fn apply_text_edit(&mut self, id: ShapeId, text: &str) -> bool {
        let page = self.document.current_page_mut();
        let Some(shape) = page.get_mut(id).and_then(|s| s.element.as_text_mut()) else {
            return false;
        };
        shape.set_text(text, self.measure.as_ref());
        true
    }

    /// Places a 200 × 150 image centered on `(x, y)` and selects it.
    pub fn add_image_at(&mut self, src: impl Into<String>, x: f32, y: f32) -> ShapeId {
        self.cancel_interaction();
        let shape = factory::create_image(Pos2::new(x, y), DEFAULT_IMAGE_SIZE, src);
        log::info!("Added image at ({x}, {y})");
        self.push_and_select(shape)
    }

    // Selection

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selection.single().and_then(|id| self.current_page().get(id))
    }

    pub fn multi_selected_shapes(&self) -> Vec<&Shape> {
        let page = self.current_page();
        self.selection.multi().iter().filter_map(|id| page.get(*id)).collect()
    }

    pub fn select(&mut self, id: ShapeId) -> bool {
        if self.current_page().get(id).is_none() {
            return false;
        }
        self.selection = Selection::Single(id);
        true
    }

    pub fn select_all(&mut self) {
        let ids = self
            .shapes()
            .iter()
            .filter(|shape| !shape.element.is_inert())
            .map(Shape::id)
            .collect();
        self.selection = Selection::from_ids(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Removes the selected shape(s). Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selection.ids();
        let page = self.document.current_page_mut();
        let removed = ids.into_iter().filter_map(|id| page.remove_shape(id)).count();
        self.selection.clear();
        self.interaction = Interaction::Idle;
        removed
    }

    // Layering

    pub fn bring_to_front(&mut self) -> bool {
        self.reorder(Page::bring_to_front)
    }

    pub fn send_to_back(&mut self) -> bool {
        self.reorder(Page::send_to_back)
    }

    pub fn move_up(&mut self) -> bool {
        self.reorder(Page::move_up)
    }

    pub fn move_down(&mut self) -> bool {
        self.reorder(Page::move_down)
    }

    fn reorder(&mut self, op: fn(&mut Page, ShapeId) -> bool) -> bool {
        match self.selection.single() {
            Some(id) => op(self.document.current_page_mut(), id),
            None => false,
        }
    }

    // Pages

    pub fn next_page(&mut self) {
        self.document.next_page();
        self.reset_view_state();
    }

    pub fn prev_page(&mut self) -> bool {
        let moved = self.document.prev_page();
        if moved {
            self.reset_view_state();
        }
        moved
    }

    pub fn set_background(&mut self, color: impl Into<String>) {
        self.document.set_background(color);
    }

    fn reset_view_state(&mut self) {
        self.selection.clear();
        self.interaction = Interaction::Idle;
    }

    // History

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Records the current document as an undo point.
    pub fn save_state(&mut self) -> HistoryResult<()> {
        self.history.save_state(&self.document)
    }

    pub fn snapshot(&self) -> HistoryResult<Snapshot> {
        Snapshot::capture(&self.document)
    }

    /// Records `before` as an undo point if the document changed since.
    pub fn commit_snapshot(&mut self, before: Snapshot) -> HistoryResult<bool> {
        if self.snapshot()? == before {
            return Ok(false);
        }
        self.history.push(before);
        Ok(true)
    }

    pub fn undo(&mut self) -> HistoryResult<bool> {
        let changed = self.history.undo(&mut self.document)?;
        if changed {
            self.reset_view_state();
        }
        Ok(changed)
    }

    pub fn redo(&mut self) -> HistoryResult<bool> {
        let changed = self.history.redo(&mut self.document)?;
        if changed {
            self.reset_view_state();
        }
        Ok(changed)
    }

    // Persistence

    pub fn export_json(&self) -> PersistenceResult<String> {
        persistence::export_json(&self.document)
    }

    /// Replaces all pages from JSON. On error nothing changes.
    pub fn import_json(&mut self, json: &str) -> PersistenceResult<()> {
        let pages = persistence::import_json(json)?;
        self.replace_pages(pages);
        Ok(())
    }

    /// Replaces all pages and returns to the first one.
    pub fn replace_pages(&mut self, pages: Vec<Page>) {
        self.document.replace_pages(pages);
        self.document.go_to_page(0);
        self.reset_view_state();
    }
}
