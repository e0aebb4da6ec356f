use crate::WhiteboardApp;
use crate::components::{ToolButton, css_color_edit};
use crate::editor::viewport::{MAX_ZOOM, MIN_ZOOM};
use crate::editor::{Editor, Tool};

pub fn tools_panel(app: &mut WhiteboardApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.editor().tool();
            ui.horizontal_wrapped(|ui| {
                for tool in Tool::ALL {
                    if ToolButton::new(tool, tool == active).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", tool.name());
                        app.editor_mut().set_tool(tool);
                    }
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                let history = app.editor().history();
                let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.redo();
                }
            });
            let history = app.editor().history();
            ui.label(format!("Undo: {}  Redo: {}", history.undo_depth(), history.redo_depth()));
            ui.separator();

            style_section(ui, app.editor_mut());
            ui.separator();

            selection_section(ui, app);
            ui.separator();

            view_section(ui, app);
            ui.separator();

            file_section(ui, app);

            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }
        });
}

fn style_section(ui: &mut egui::Ui, editor: &mut Editor) {
    ui.strong("Style");
    let style = editor.style_mut();
    css_color_edit(ui, "Stroke", &mut style.stroke_color);
    css_color_edit(ui, "Fill", &mut style.fill_color);
    css_color_edit(ui, "Text", &mut style.text_color);
    ui.horizontal(|ui| {
        ui.label("Width:");
        ui.add(egui::Slider::new(&mut style.stroke_width, 1.0..=20.0));
    });
    ui.horizontal(|ui| {
        ui.label("Font size:");
        ui.add(egui::Slider::new(&mut style.font_size, 8.0..=96.0));
    });
}

fn selection_section(ui: &mut egui::Ui, app: &mut WhiteboardApp) {
    ui.strong("Selection");
    let has_single = app.editor().selected_shape().is_some();
    let has_any = !app.editor().selection().is_empty();

    ui.horizontal_wrapped(|ui| {
        if ui.add_enabled(has_single, egui::Button::new("To front")).clicked() {
            app.reorder(Editor::bring_to_front);
        }
        if ui.add_enabled(has_single, egui::Button::new("Up")).clicked() {
            app.reorder(Editor::move_up);
        }
        if ui.add_enabled(has_single, egui::Button::new("Down")).clicked() {
            app.reorder(Editor::move_down);
        }
        if ui.add_enabled(has_single, egui::Button::new("To back")).clicked() {
            app.reorder(Editor::send_to_back);
        }
    });
    ui.horizontal(|ui| {
        if ui.button("Select all").clicked() {
            app.editor_mut().select_all();
        }
        if ui.add_enabled(has_any, egui::Button::new("Delete")).clicked() {
            app.delete_selected();
        }
    });
}

fn view_section(ui: &mut egui::Ui, app: &mut WhiteboardApp) {
    ui.strong("Page");
    let editor = app.editor();
    let (index, count) = (editor.document().current_page_index(), editor.document().page_count());
    ui.horizontal(|ui| {
        if ui.add_enabled(index > 0, egui::Button::new("◀")).clicked() {
            app.prev_page();
        }
        ui.label(format!("{} / {}", index + 1, count));
        if ui.button("▶").clicked() {
            app.next_page();
        }
    });

    let mut background = app.editor().current_page().bg_color.clone();
    if css_color_edit(ui, "Background", &mut background) {
        app.set_background(background);
    }

    let editor = app.editor_mut();
    let mut zoom = editor.zoom();
    ui.horizontal(|ui| {
        ui.label("Zoom:");
        if ui
            .add(egui::Slider::new(&mut zoom, MIN_ZOOM..=MAX_ZOOM).custom_formatter(|z, _| format!("{:.0}%", z * 100.0)))
            .changed()
        {
            editor.set_zoom(zoom);
        }
    });
    let mut snap = editor.config().snap_to_grid;
    if ui.checkbox(&mut snap, "Snap to grid").changed() {
        editor.set_snap_to_grid(snap);
    }
}

fn file_section(ui: &mut egui::Ui, app: &mut WhiteboardApp) {
    ui.strong("File");
    ui.horizontal(|ui| {
        #[cfg(not(target_arch = "wasm32"))]
        {
            if ui.button("Save").clicked() {
                app.save_to_file();
            }
            if ui.button("Load").clicked() {
                app.load_from_file();
            }
            if ui.button("Export PNG").clicked() {
                app.request_png_export(ui.ctx());
            }
        }
        if ui.button("Copy JSON").clicked() {
            match app.editor().export_json() {
                Ok(json) => ui.ctx().copy_text(json),
                Err(err) => log::error!("Export failed: {err}"),
            }
        }
    });
    ui.label("Drop images or a whiteboard .json onto the window to import.");
}
