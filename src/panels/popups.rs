use crate::WhiteboardApp;

/// Floating windows: the text editor and the image drop prompt.
pub fn popups(app: &mut WhiteboardApp, ctx: &egui::Context) {
    text_editor(app, ctx);
    image_prompt(app, ctx);
}

fn text_editor(app: &mut WhiteboardApp, ctx: &egui::Context) {
    let mut commit = false;
    let mut cancel = false;

    if let Some(edit) = app.text_edit_mut() {
        egui::Window::new("Edit text")
            .collapsible(false)
            .resizable(false)
            .fixed_pos(edit.screen_rect.left_top())
            .show(ctx, |ui| {
                let response = ui.add(
                    egui::TextEdit::multiline(&mut edit.buffer)
                        .desired_width(edit.screen_rect.width().max(200.0))
                        .desired_rows(3)
                        .hint_text(crate::shape::text::TEXT_PLACEHOLDER),
                );
                response.request_focus();
                ui.horizontal(|ui| {
                    commit = ui.button("OK").clicked();
                    cancel = ui.button("Cancel").clicked();
                });
                if ui.input(|i| i.key_pressed(egui::Key::Enter) && i.modifiers.command) {
                    commit = true;
                }
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    cancel = true;
                }
            });
    }

    if commit {
        app.commit_text_edit();
    } else if cancel {
        app.cancel_text_edit();
    }
}

fn image_prompt(app: &mut WhiteboardApp, ctx: &egui::Context) {
    if app.image_prompt().is_none() {
        return;
    }

    let mut cancel = false;
    egui::Window::new("Add image")
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label("Drop an image file onto the canvas to place it here.");
            cancel = ui.button("Cancel").clicked();
        });

    if cancel {
        app.cancel_image_prompt();
    }
}
