use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use super::common::{self, Transform, default_stroke_color, default_stroke_width};
use crate::surface::Surface;

fn default_fill() -> String {
    common::DEFAULT_RECT_FILL.to_owned()
}

/// Filled, stroked rectangle spanning `[-w/2, w/2] × [-h/2, h/2]` locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    #[serde(flatten)]
    pub transform: Transform,
    #[serde(alias = "w")]
    pub width: f32,
    #[serde(alias = "h")]
    pub height: f32,
    #[serde(default = "default_fill")]
    pub fill_color: String,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
}

impl Rectangle {
    pub fn new(center: Pos2, size: Vec2, fill_color: &str, stroke_color: &str, stroke_width: f32) -> Self {
        Self {
            transform: Transform::new(center.x, center.y, 0.0),
            width: size.x,
            height: size.y,
            fill_color: fill_color.to_owned(),
            stroke_color: stroke_color.to_owned(),
            stroke_width,
        }
    }
}

impl Element for Rectangle {
    fn element_type(&self) -> &'static str {
        "rectangle"
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
        let rect = common::local_box(self.size());
        surface.save();
        surface.translate(self.transform.x, self.transform.y);
        surface.rotate(self.transform.angle);
        surface.fill_rect(rect, &self.fill_color);
        surface.stroke_rect(rect, &self.stroke_color, self.stroke_width);
        surface.restore();
    }
}
