//! Drawing collaborators consumed by the shape model.
//!
//! Shapes never talk to egui directly: they draw into a [`Surface`], a
//! canvas-like API with a transform stack, and measure text through
//! [`TextMeasure`]. The egui implementation lives in [`crate::renderer`].

use egui::{Pos2, Rect, Vec2};

/// Measures the rendered width of a single line of text.
pub trait TextMeasure {
    fn measure_text_width(&self, line: &str, font_size: f32) -> f32;
}

/// A 2D drawing surface with a save/restore transform stack.
///
/// Colors are CSS color strings, exactly as stored on the shapes.
pub trait Surface: TextMeasure {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, angle: f32);
    fn scale(&mut self, sx: f32, sy: f32);

    fn fill_rect(&mut self, rect: Rect, color: &str);
    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f32);
    fn ellipse(&mut self, center: Pos2, radii: Vec2, fill: Option<&str>, stroke: Option<(&str, f32)>);
    fn polyline(&mut self, points: &[Pos2], color: &str, width: f32);
    /// Draws `text` with its top-left corner at `pos`.
    fn text(&mut self, pos: Pos2, text: &str, font_size: f32, color: &str);
    fn image(&mut self, rect: Rect, src: &str);

    fn line(&mut self, from: Pos2, to: Pos2, color: &str, width: f32) {
        self.polyline(&[from, to], color, width);
    }
}

/// Width estimate for headless use: every glyph is `0.6 × font_size` wide.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonospaceMeasure;

pub const MONOSPACE_ADVANCE: f32 = 0.6;

impl TextMeasure for MonospaceMeasure {
    fn measure_text_width(&self, line: &str, font_size: f32) -> f32 {
        line.chars().count() as f32 * font_size * MONOSPACE_ADVANCE
    }
}

/// Affine transform `[a c e; b d f; 0 0 1]`, the same layout as a canvas
/// `setTransform`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    /// `self × other`: `other` is applied first.
    pub fn then(&self, other: &Affine) -> Affine {
        Affine {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Affine {
        self.then(&Affine { e: dx, f: dy, ..Affine::IDENTITY })
    }

    pub fn rotated(&self, angle: f32) -> Affine {
        let (sin, cos) = angle.sin_cos();
        self.then(&Affine { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 })
    }

    pub fn scaled(&self, sx: f32, sy: f32) -> Affine {
        self.then(&Affine { a: sx, d: sy, ..Affine::IDENTITY })
    }

    pub fn apply(&self, p: Pos2) -> Pos2 {
        Pos2::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Uniform scale factor (geometric mean of the axis scales).
    pub fn scale_factor(&self) -> f32 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }

    pub fn rotation(&self) -> f32 {
        self.b.atan2(self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affine_translate_then_rotate() {
        let t = Affine::IDENTITY.translated(10.0, 0.0).rotated(std::f32::consts::FRAC_PI_2);
        let p = t.apply(Pos2::new(1.0, 0.0));
        assert!((p.x - 10.0).abs() < 1e-5);
        assert!((p.y - 1.0).abs() < 1e-5);
        assert!((t.rotation() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_affine_scale_factor() {
        let t = Affine::IDENTITY.scaled(2.0, 2.0).rotated(0.3);
        assert!((t.scale_factor() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_monospace_measure() {
        assert_eq!(MonospaceMeasure.measure_text_width("abcd", 10.0), 24.0);
        assert_eq!(MonospaceMeasure.measure_text_width("", 10.0), 0.0);
    }
}
