use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect, Vec2};

/// Keyboard commands understood by the whiteboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Delete,
    Undo,
    Redo,
    SelectAll,
    Cancel,
    NextPage,
    PrevPage,
}

/// Maps a key press to a whiteboard command.
pub fn shortcut_for(key: Key, modifiers: Modifiers) -> Option<Shortcut> {
    let shortcut = match key {
        Key::Delete | Key::Backspace => Shortcut::Delete,
        Key::Z if modifiers.command && modifiers.shift => Shortcut::Redo,
        Key::Z if modifiers.command => Shortcut::Undo,
        Key::Y if modifiers.command => Shortcut::Redo,
        Key::A if modifiers.command => Shortcut::SelectAll,
        Key::Escape => Shortcut::Cancel,
        Key::PageDown => Shortcut::NextPage,
        Key::PageUp => Shortcut::PrevPage,
        _ => return None,
    };
    Some(shortcut)
}

/// Canvas input, with positions relative to the canvas top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { position: Pos2 },
    PointerMove { position: Pos2 },
    PointerUp { position: Pos2 },
    DoubleClick { position: Pos2 },
    /// Ctrl/Cmd + wheel: multiply the zoom by `factor` around `anchor`.
    Zoom { anchor: Pos2, factor: f32 },
    /// Plain wheel scrolling, in screen pixels.
    Scroll { delta: Vec2 },
    Shortcut(Shortcut),
}

/// Turns raw egui input into [`InputEvent`]s for one canvas.
///
/// A press has to start inside the canvas; once it has, moves and the
/// release are reported wherever the pointer goes.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    dragging: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Process raw egui input and generate our InputEvents
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect, keyboard: bool) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let local = |pos: Pos2| (pos - canvas_rect.min).to_pos2();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();
            let over_canvas = hover.is_some_and(|pos| canvas_rect.contains(pos));

            if input.pointer.button_pressed(PointerButton::Primary) && over_canvas {
                if let Some(pos) = hover {
                    self.dragging = true;
                    events.push(InputEvent::PointerDown { position: local(pos) });
                }
            }

            if let Some(pos) = hover {
                if self.dragging && Some(pos) != self.last_pointer_pos {
                    events.push(InputEvent::PointerMove { position: local(pos) });
                }
                self.last_pointer_pos = Some(pos);
            }

            if self.dragging && !input.pointer.button_down(PointerButton::Primary) {
                self.dragging = false;
                let position = hover.or(self.last_pointer_pos).map(local).unwrap_or_default();
                events.push(InputEvent::PointerUp { position });
            }

            if input.pointer.button_double_clicked(PointerButton::Primary) && over_canvas {
                if let Some(pos) = hover {
                    events.push(InputEvent::DoubleClick { position: local(pos) });
                }
            }

            if over_canvas {
                if let Some(pos) = hover {
                    let zoom = input.zoom_delta();
                    if zoom != 1.0 {
                        events.push(InputEvent::Zoom { anchor: local(pos), factor: zoom });
                    } else if input.smooth_scroll_delta != Vec2::ZERO {
                        events.push(InputEvent::Scroll { delta: input.smooth_scroll_delta });
                    }
                }
            }

            if keyboard {
                for event in &input.raw.events {
                    if let egui::Event::Key { key, pressed: true, modifiers, .. } = event {
                        if let Some(shortcut) = shortcut_for(*key, *modifiers) {
                            events.push(InputEvent::Shortcut(shortcut));
                        }
                    }
                }
            }
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcuts() {
        assert_eq!(shortcut_for(Key::Delete, Modifiers::NONE), Some(Shortcut::Delete));
        assert_eq!(shortcut_for(Key::Z, Modifiers::COMMAND), Some(Shortcut::Undo));
        assert_eq!(
            shortcut_for(Key::Z, Modifiers::COMMAND | Modifiers::SHIFT),
            Some(Shortcut::Redo)
        );
        assert_eq!(shortcut_for(Key::Y, Modifiers::COMMAND), Some(Shortcut::Redo));
        assert_eq!(shortcut_for(Key::Z, Modifiers::NONE), None);
        assert_eq!(shortcut_for(Key::A, Modifiers::NONE), None);
    }
}
