use egui::{Pos2, Vec2};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 5.0;

/// Maps screen positions (relative to the canvas origin) to logical ones:
/// `logical = (screen - pan) / zoom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f32,
    pub pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { zoom: 1.0, pan: Vec2::ZERO }
    }
}

impl Viewport {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    /// Zooms while keeping the logical point under `anchor` in place.
    pub fn zoom_around(&mut self, anchor: Pos2, zoom: f32) {
        let logical = self.screen_to_logical(anchor);
        self.set_zoom(zoom);
        self.pan = anchor.to_vec2() - logical.to_vec2() * self.zoom;
    }

    pub fn screen_to_logical(&self, screen: Pos2) -> Pos2 {
        ((screen - self.pan).to_vec2() / self.zoom).to_pos2()
    }

    pub fn logical_to_screen(&self, logical: Pos2) -> Pos2 {
        (logical.to_vec2() * self.zoom).to_pos2() + self.pan
    }

    /// Keeps the content (`content_size` logical units from the origin)
    /// covering the canvas where possible.
    pub fn clamp_pan(&self, pan: Vec2, canvas_size: Vec2, content_size: Vec2) -> Vec2 {
        let min = canvas_size - content_size * self.zoom;
        Vec2::new(pan.x.max(min.x).min(0.0), pan.y.max(min.y).min(0.0))
    }
}
