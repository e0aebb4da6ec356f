use egui::{Pos2, Rect};

use crate::document::Page;
use crate::editor::{Editor, EditorConfig, ImageRequest, PointerOutcome, TextEditRequest, Tool};
use crate::file_handler::{DroppedContent, FileHandler};
use crate::history::Snapshot;
use crate::id_generator::ShapeId;
use crate::input::{InputEvent, InputHandler, Shortcut};
use crate::panels;
use crate::renderer::{EguiTextMeasure, Renderer};

/// File used by the save/load buttons on native builds.
pub const WHITEBOARD_FILE: &str = "whiteboard.json";

/// Text being edited in the floating editor window.
#[derive(Debug, Clone)]
pub struct TextEditState {
    pub id: ShapeId,
    pub screen_rect: Rect,
    pub buffer: String,
}

/// Image placement waiting for a file to be dropped.
#[derive(Debug, Clone, Copy)]
pub struct ImagePrompt {
    pub position: Pos2,
}

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct WhiteboardApp {
    config: EditorConfig,
    pages: Vec<Page>,
    tool: Tool,

    #[serde(skip)]
    editor: Editor,
    #[serde(skip)]
    renderer: Renderer,
    #[serde(skip)]
    input: InputHandler,
    #[serde(skip)]
    files: FileHandler,
    #[serde(skip)]
    canvas_rect: Rect,
    #[serde(skip)]
    gesture_start: Option<Snapshot>,
    #[serde(skip)]
    text_edit: Option<TextEditState>,
    #[serde(skip)]
    image_prompt: Option<ImagePrompt>,
    #[serde(skip)]
    background_edit: Option<Snapshot>,
    #[serde(skip)]
    png_export_requested: bool,
    #[serde(skip)]
    status: Option<String>,
}

impl Default for WhiteboardApp {
    fn default() -> Self {
        Self {
            config: EditorConfig::default(),
            pages: Vec::new(),
            tool: Tool::Select,
            editor: Editor::default(),
            renderer: Renderer::new(),
            input: InputHandler::new(),
            files: FileHandler::new(),
            canvas_rect: Rect::NOTHING,
            gesture_start: None,
            text_edit: None,
            image_prompt: None,
            background_edit: None,
            png_export_requested: false,
            status: None,
        }
    }
}

impl WhiteboardApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        app.editor = Editor::new(app.config.clone());
        let pages = std::mem::take(&mut app.pages);
        if !pages.is_empty() {
            log::info!("Restored {} page(s) from app storage", pages.len());
            app.editor.replace_pages(pages);
        }
        app.editor.set_tool(app.tool);
        app.editor
            .set_text_measure(Box::new(EguiTextMeasure::new(cc.egui_ctx.clone())));
        app
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn render(&mut self, painter: &egui::Painter, canvas_rect: Rect) {
        self.renderer.render(painter, canvas_rect, &self.editor);
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn text_edit_mut(&mut self) -> Option<&mut TextEditState> {
        self.text_edit.as_mut()
    }

    pub fn image_prompt(&self) -> Option<ImagePrompt> {
        self.image_prompt
    }

    /// Records an undo point before a one-shot mutation.
    pub fn checkpoint(&mut self) {
        if let Err(err) = self.editor.save_state() {
            log::error!("{err}");
        }
    }

    pub fn undo(&mut self) {
        self.close_popups();
        match self.editor.undo() {
            Ok(_) => {}
            Err(err) => {
                log::error!("{err}");
                self.set_status(format!("Undo failed: {err}"));
            }
        }
    }

    pub fn redo(&mut self) {
        self.close_popups();
        match self.editor.redo() {
            Ok(_) => {}
            Err(err) => {
                log::error!("{err}");
                self.set_status(format!("Redo failed: {err}"));
            }
        }
    }

    fn close_popups(&mut self) {
        self.text_edit = None;
        self.image_prompt = None;
    }

    pub fn delete_selected(&mut self) {
        if !self.editor.selection().is_empty() {
            self.checkpoint();
            self.editor.delete_selected();
        }
    }

    /// Runs a layering operation on the selection as one undo step.
    pub fn reorder(&mut self, op: fn(&mut Editor) -> bool) {
        let before = self.editor.snapshot();
        if op(&mut self.editor) {
            if let Ok(before) = before {
                if let Err(err) = self.editor.commit_snapshot(before) {
                    log::error!("{err}");
                }
            }
        }
    }

    /// Changes made while the pointer is held become one undo step.
    pub fn set_background(&mut self, color: String) {
        if self.background_edit.is_none() {
            self.background_edit = self.editor.snapshot().ok();
        }
        self.editor.set_background(color);
    }

    fn finish_background_edit(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.pointer.any_down()) {
            return;
        }
        if let Some(before) = self.background_edit.take() {
            if let Err(err) = self.editor.commit_snapshot(before) {
                log::error!("{err}");
            }
        }
    }

    pub fn next_page(&mut self) {
        self.close_popups();
        self.editor.next_page();
    }

    pub fn prev_page(&mut self) {
        self.close_popups();
        self.editor.prev_page();
    }

    pub fn import_json(&mut self, json: &str) {
        let before = self.editor.snapshot();
        match self.editor.import_json(json) {
            Ok(()) => {
                if let Ok(before) = before {
                    if let Err(err) = self.editor.commit_snapshot(before) {
                        log::error!("{err}");
                    }
                }
                self.close_popups();
                self.set_status("Whiteboard loaded");
            }
            Err(err) => {
                log::error!("Import failed: {err}");
                self.set_status(format!("Import failed: {err}"));
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self) {
        match crate::persistence::save_to_file(self.editor.document(), WHITEBOARD_FILE) {
            Ok(()) => self.set_status(format!("Saved {WHITEBOARD_FILE}")),
            Err(err) => {
                log::error!("{err}");
                self.set_status(format!("Save failed: {err}"));
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(&mut self) {
        let before = self.editor.snapshot();
        match crate::persistence::load_from_file(WHITEBOARD_FILE) {
            Ok(pages) => {
                self.editor.replace_pages(pages);
                if let Ok(before) = before {
                    if let Err(err) = self.editor.commit_snapshot(before) {
                        log::error!("{err}");
                    }
                }
                self.close_popups();
                self.set_status(format!("Loaded {WHITEBOARD_FILE}"));
            }
            Err(err) => {
                log::error!("Failed to load {WHITEBOARD_FILE}: {err}");
                self.set_status(format!("Load failed: {err}"));
            }
        }
    }

    /// Feeds canvas input to the editor, taking undo snapshots around gestures.
    pub fn handle_canvas_input(&mut self, ctx: &egui::Context, canvas_rect: Rect) {
        self.editor.set_canvas_size(canvas_rect.size());
        self.canvas_rect = canvas_rect;
        let keyboard = self.text_edit.is_none() && !ctx.wants_keyboard_input();
        let events = self.input.process_input(ctx, canvas_rect, keyboard);

        for event in events {
            match event {
                InputEvent::PointerDown { position } => {
                    if self.text_edit.is_some() {
                        self.commit_text_edit();
                    }
                    self.gesture_start = self.editor.snapshot().ok();
                    let outcome = self.editor.pointer_down(position);
                    self.handle_outcome(outcome);
                }
                InputEvent::PointerMove { position } => self.editor.pointer_move(position),
                InputEvent::PointerUp { position } => {
                    self.editor.pointer_up(position);
                    if let Some(before) = self.gesture_start.take() {
                        if let Err(err) = self.editor.commit_snapshot(before) {
                            log::error!("{err}");
                        }
                    }
                }
                InputEvent::DoubleClick { position } => {
                    if let Some(request) = self.editor.double_click(position) {
                        self.open_text_edit(request);
                    }
                }
                InputEvent::Zoom { anchor, factor } => {
                    let zoom = self.editor.zoom() * factor;
                    self.editor.zoom_around(anchor, zoom);
                }
                InputEvent::Scroll { delta } => {
                    let pan = self.editor.viewport().pan + delta;
                    self.editor.set_pan(pan);
                }
                InputEvent::Shortcut(shortcut) => self.handle_shortcut(shortcut),
            }
        }

        for dropped in self.files.take_dropped(ctx) {
            self.handle_dropped(dropped, canvas_rect);
        }
    }

    fn handle_outcome(&mut self, outcome: PointerOutcome) {
        match outcome {
            PointerOutcome::None => {}
            PointerOutcome::EditText(request) => self.open_text_edit(request),
            PointerOutcome::PickImage(ImageRequest { position }) => self.pick_image(position),
        }
    }

    fn handle_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::Delete => self.delete_selected(),
            Shortcut::Undo => self.undo(),
            Shortcut::Redo => self.redo(),
            Shortcut::SelectAll => self.editor.select_all(),
            Shortcut::Cancel => {
                self.editor.cancel_interaction();
                self.editor.clear_selection();
                self.close_popups();
            }
            Shortcut::NextPage => self.next_page(),
            Shortcut::PrevPage => self.prev_page(),
        }
    }

    fn handle_dropped(&mut self, dropped: DroppedContent, canvas_rect: Rect) {
        match dropped {
            DroppedContent::Image { name, data_url } => {
                let position = match self.image_prompt.take() {
                    Some(prompt) => prompt.position,
                    None => self.editor.screen_to_logical((canvas_rect.size() / 2.0).to_pos2()),
                };
                self.place_image(data_url, position);
                self.set_status(format!("Added {name}"));
            }
            DroppedContent::Whiteboard { json, .. } => self.import_json(&json),
        }
    }

    pub fn place_image(&mut self, src: String, position: Pos2) {
        self.checkpoint();
        self.editor.add_image_at(src, position.x, position.y);
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn pick_image(&mut self, position: Pos2) {
        if let Some(DroppedContent::Image { name, data_url }) = crate::file_handler::dialogs::pick_image() {
            self.place_image(data_url, position);
            self.set_status(format!("Added {name}"));
        }
    }

    /// The browser has no blocking picker: wait for a dropped file instead.
    #[cfg(target_arch = "wasm32")]
    fn pick_image(&mut self, position: Pos2) {
        self.image_prompt = Some(ImagePrompt { position });
    }

    pub fn cancel_image_prompt(&mut self) {
        self.image_prompt = None;
    }

    fn open_text_edit(&mut self, request: TextEditRequest) {
        let TextEditRequest { id, screen_rect, initial_text } = request;
        let screen_rect = screen_rect.translate(self.canvas_rect.min.to_vec2());
        self.text_edit = Some(TextEditState { id, screen_rect, buffer: initial_text });
    }

    /// Applies the edited text as one undo step and closes the editor.
    pub fn commit_text_edit(&mut self) {
        if let Some(edit) = self.text_edit.take() {
            self.checkpoint();
            if !self.editor.apply_text_edit(edit.id, &edit.buffer) {
                log::warn!("Edited text shape no longer exists");
            }
        }
    }

    pub fn cancel_text_edit(&mut self) {
        self.text_edit = None;
    }

    /// Asks the backend for a screenshot; the canvas is cut out of it when it arrives.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn request_png_export(&mut self, ctx: &egui::Context) {
        self.png_export_requested = true;
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        if !self.png_export_requested {
            return;
        }
        let screenshot = ctx.input(|i| {
            i.raw.events.iter().find_map(|event| match event {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(screenshot) = screenshot else {
            return;
        };
        self.png_export_requested = false;

        let png = match crate::image::canvas_png(&screenshot, self.canvas_rect, ctx.pixels_per_point()) {
            Ok(png) => png,
            Err(err) => {
                log::error!("PNG export failed: {err}");
                self.set_status(format!("PNG export failed: {err}"));
                return;
            }
        };
        match crate::file_handler::dialogs::save_png(&png) {
            Ok(Some(path)) => self.set_status(format!("Exported {}", path.display())),
            Ok(None) => {}
            Err(err) => {
                log::error!("Failed to write PNG: {err}");
                self.set_status(format!("PNG export failed: {err}"));
            }
        }
    }
}

impl eframe::App for WhiteboardApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.config = self.editor.config().clone();
        self.tool = self.editor.tool();
        self.pages = self.editor.document().pages().to_vec();
        eframe::set_value(storage, eframe::APP_KEY, self);
        self.pages.clear();
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::tools_panel(self, ctx);
        panels::central_panel(self, ctx);
        panels::popups(self, ctx);
        self.finish_background_edit(ctx);

        #[cfg(not(target_arch = "wasm32"))]
        self.handle_screenshot(ctx);

        if self.input.is_dragging() {
            ctx.request_repaint();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FIRST_PAGE_BG;
    use crate::shape::{Element, ElementType};

    #[test]
    fn test_background_drag_is_one_undo_step() {
        let mut app = WhiteboardApp::default();
        for color in ["#101010", "#202020", "#303030"] {
            app.set_background(color.to_owned());
        }
        app.finish_background_edit(&egui::Context::default());

        assert_eq!(app.editor().history().undo_depth(), 1);
        assert_eq!(app.editor().current_page().bg_color, "#303030");

        app.undo();
        assert_eq!(app.editor().current_page().bg_color, FIRST_PAGE_BG);
    }

    #[test]
    fn test_dropped_image_lands_at_prompt() {
        let mut app = WhiteboardApp::default();
        app.image_prompt = Some(ImagePrompt { position: Pos2::new(40.0, 60.0) });
        let canvas = Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0));
        let data_url = "data:image/png;base64,AAAA".to_owned();

        app.handle_dropped(DroppedContent::Image { name: "cat.png".to_owned(), data_url: data_url.clone() }, canvas);

        assert!(app.image_prompt().is_none());
        let shapes = app.editor().shapes();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].element.center(), Pos2::new(40.0, 60.0));
        match &shapes[0].element {
            ElementType::Image(image) => assert_eq!(image.src, data_url),
            other => panic!("expected an image, got {other:?}"),
        }
        assert_eq!(app.status(), Some("Added cat.png"));
    }
}
