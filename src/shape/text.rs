use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use super::common::{self, Transform};
use crate::surface::{Surface, TextMeasure};

pub const DEFAULT_FONT_SIZE: f32 = 24.0;
pub const DEFAULT_TEXT_COLOR: &str = "#000";
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;
/// Padding added around the measured text block.
pub const TEXT_MARGIN: f32 = 10.0;
pub const TEXT_MIN_WIDTH: f32 = 50.0;
pub const TEXT_MIN_HEIGHT: f32 = 30.0;
pub const TEXT_PLACEHOLDER: &str = "Type your text...";
const PLACEHOLDER_COLOR: &str = "#888888";

fn default_font_size() -> f32 {
    DEFAULT_FONT_SIZE
}

fn default_color() -> String {
    DEFAULT_TEXT_COLOR.to_owned()
}

/// Multi-line text block. Its box is derived from the text and font size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    #[serde(flatten)]
    pub transform: Transform,
    #[serde(default, alias = "w")]
    pub width: f32,
    #[serde(default, alias = "h")]
    pub height: f32,
    #[serde(default = "default_color", alias = "strokeColor")]
    pub color: String,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

impl Text {
    /// Creates an empty text block of the minimum size.
    pub fn new(center: Pos2, color: &str, font_size: f32) -> Self {
        Self {
            transform: Transform::new(center.x, center.y, 0.0),
            width: TEXT_MIN_WIDTH,
            height: TEXT_MIN_HEIGHT,
            color: color.to_owned(),
            text: String::new(),
            font_size,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }

    /// Replaces the text and re-derives the box from the measured lines.
    pub fn set_text(&mut self, text: impl Into<String>, measure: &dyn TextMeasure) {
        self.text = text.into();
        self.fit_to_text(measure);
    }

    /// Re-derives width and height from the current text and font size.
    pub fn fit_to_text(&mut self, measure: &dyn TextMeasure) {
        let mut widest: f32 = 0.0;
        let mut line_count = 0;
        for line in self.lines() {
            widest = widest.max(measure.measure_text_width(line, self.font_size));
            line_count += 1;
        }
        let line_height = self.font_size * LINE_HEIGHT_FACTOR;
        self.width = (widest + TEXT_MARGIN).max(TEXT_MIN_WIDTH);
        self.height = (line_count as f32 * line_height + TEXT_MARGIN).max(TEXT_MIN_HEIGHT);
    }

    /// Applies the minimum size floors without re-measuring.
    pub fn apply_min_size(&mut self) {
        self.width = self.width.max(TEXT_MIN_WIDTH);
        self.height = self.height.max(TEXT_MIN_HEIGHT);
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl Element for Text {
    fn element_type(&self) -> &'static str {
        "text"
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    fn set_size(&mut self, size: Vec2) {
        self.width = size.x.max(0.0);
        self.height = size.y.max(0.0);
    }

    fn local_contains(&self, local: Vec2) -> bool {
        common::local_box_contains(local, self.size())
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let (content, color) = if self.is_blank() {
            (TEXT_PLACEHOLDER, PLACEHOLDER_COLOR)
        } else {
            (self.text.as_str(), self.color.as_str())
        };
        let line_height = self.font_size * LINE_HEIGHT_FACTOR;
        let origin = Pos2::new(-self.width / 2.0 + TEXT_MARGIN / 2.0, -self.height / 2.0 + TEXT_MARGIN / 2.0);

        surface.save();
        surface.translate(self.transform.x, self.transform.y);
        surface.rotate(self.transform.angle);
        for (i, line) in content.split('\n').enumerate() {
            let pos = origin + Vec2::new(0.0, i as f32 * line_height);
            surface.text(pos, line, self.font_size, color);
        }
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MonospaceMeasure;

    #[test]
    fn test_set_text_measures_widest_line() {
        let mut text = Text::new(Pos2::ZERO, "#000", 10.0);
        text.set_text("abcdefghij\nabc", &MonospaceMeasure);

        // 10 glyphs * 6 px + margin
        assert!((text.width - 70.0).abs() < 1e-4);
        // 2 lines * 12 px + margin
        assert!((text.height - 34.0).abs() < 1e-4);
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_set_text_applies_floors() {
        let mut text = Text::new(Pos2::ZERO, "#000", 10.0);
        text.set_text("a", &MonospaceMeasure);
        assert_eq!(text.width, TEXT_MIN_WIDTH);
        assert_eq!(text.height, TEXT_MIN_HEIGHT);
    }
}
