use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use super::common::{self, Transform, default_stroke_color, default_stroke_width};
use crate::surface::Surface;

fn default_fill() -> String {
    common::DEFAULT_ELLIPSE_FILL.to_owned()
}

/// Axis-aligned (in its local frame) ellipse inscribed in `width × height`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
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

impl Ellipse {
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

    pub fn radii(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Element for Ellipse {
    fn element_type(&self) -> &'static str {
        "ellipse"
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
        let r = self.radii();
        // A degenerate ellipse has no area.
        if r.x <= 0.0 || r.y <= 0.0 {
            return false;
        }
        (local.x / r.x).powi(2) + (local.y / r.y).powi(2) <= 1.0
    }

    fn draw(&self, surface: &mut dyn Surface) {
        surface.save();
        surface.translate(self.transform.x, self.transform.y);
        surface.rotate(self.transform.angle);
        surface.ellipse(
            Pos2::ZERO,
            self.radii(),
            Some(&self.fill_color),
            Some((&self.stroke_color, self.stroke_width)),
        );
        surface.restore();
    }
}
