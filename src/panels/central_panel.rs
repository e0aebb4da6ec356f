use crate::WhiteboardApp;

pub fn central_panel(app: &mut WhiteboardApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            app.handle_canvas_input(ctx, canvas_rect);

            app.render(&painter, canvas_rect);

            if let Some(hover) = response.hover_pos() {
                let editor = app.editor();
                let cursor = match editor.tool() {
                    crate::editor::Tool::Hand => egui::CursorIcon::Grab,
                    crate::editor::Tool::Select => hover_cursor(editor, hover - canvas_rect.min.to_vec2()),
                    _ => egui::CursorIcon::Crosshair,
                };
                ctx.set_cursor_icon(cursor);
            }
        });
}

fn hover_cursor(editor: &crate::editor::Editor, screen: egui::Pos2) -> egui::CursorIcon {
    use crate::geometry::{HandleHit, hit_testing};

    let Some(shape) = editor.selected_shape() else {
        return egui::CursorIcon::Default;
    };
    let p = editor.screen_to_logical(screen);
    let zoom = editor.zoom();
    let config = editor.config();
    match hit_testing::hit_handle(&shape.element, p, config.corner_tolerance / zoom, config.rotate_tolerance / zoom) {
        Some(HandleHit::Corner(corner)) => corner.cursor_icon(),
        Some(HandleHit::Rotate) => egui::CursorIcon::Alias,
        None => egui::CursorIcon::Default,
    }
}
