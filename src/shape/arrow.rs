use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use super::common::{Transform, default_stroke_color, default_stroke_width};
use crate::surface::Surface;

/// Length of each head stroke.
pub const ARROW_HEAD_LENGTH: f32 = 18.0;
/// Angle between the shaft and each head stroke (radians).
pub const ARROW_HEAD_ANGLE: f32 = 0.588;
/// Half-thickness of the band around the shaft that counts as a hit.
pub const ARROW_HIT_TOLERANCE: f32 = 10.0;

/// Straight arrow centered on its shaft, pointing along `+x` in its local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    #[serde(flatten)]
    pub transform: Transform,
    #[serde(alias = "width", alias = "w")]
    pub length: f32,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
}

impl Arrow {
    pub fn new(center: Pos2, length: f32, angle: f32, stroke_color: &str, stroke_width: f32) -> Self {
        Self {
            transform: Transform::new(center.x, center.y, angle),
            length: length.max(0.0),
            stroke_color: stroke_color.to_owned(),
            stroke_width,
        }
    }

    /// Arrow from `(x1, y1)` (tail) to `(x2, y2)` (head).
    pub fn from_points(x1: f32, y1: f32, x2: f32, y2: f32, color: &str, width: f32) -> Self {
        let start = Pos2::new(x1, y1);
        let end = Pos2::new(x2, y2);
        let delta = end - start;
        Self::new(start.lerp(end, 0.5), delta.length(), delta.y.atan2(delta.x), color, width)
    }

    /// Local-space head strokes, each as (tip, barb end).
    fn head(&self) -> [(Pos2, Pos2); 2] {
        let tip = Pos2::new(self.length / 2.0, 0.0);
        let back = ARROW_HEAD_LENGTH * ARROW_HEAD_ANGLE.cos();
        let spread = ARROW_HEAD_LENGTH * ARROW_HEAD_ANGLE.sin();
        [
            (tip, Pos2::new(tip.x - back, -spread)),
            (tip, Pos2::new(tip.x - back, spread)),
        ]
    }
}

impl Element for Arrow {
    fn element_type(&self) -> &'static str {
        "arrow"
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// The arrow's handle box is its shaft by the hit band.
    fn size(&self) -> Vec2 {
        Vec2::new(self.length, ARROW_HIT_TOLERANCE * 2.0)
    }

    fn set_size(&mut self, size: Vec2) {
        self.length = size.x.max(0.0);
    }

    fn has_fixed_height(&self) -> bool {
        true
    }

    fn local_contains(&self, local: Vec2) -> bool {
        local.x.abs() <= self.length / 2.0 && local.y.abs() <= ARROW_HIT_TOLERANCE
    }

    fn bounding_box(&self) -> Rect {
        let spread = ARROW_HEAD_LENGTH * ARROW_HEAD_ANGLE.sin();
        let extent = Vec2::new(self.length + self.stroke_width, 2.0 * spread + self.stroke_width);
        Rect::from_center_size(self.center(), extent)
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let half = self.length / 2.0;
        surface.save();
        surface.translate(self.transform.x, self.transform.y);
        surface.rotate(self.transform.angle);
        surface.line(Pos2::new(-half, 0.0), Pos2::new(half, 0.0), &self.stroke_color, self.stroke_width);
        for (tip, barb) in self.head() {
            surface.line(tip, barb, &self.stroke_color, self.stroke_width);
        }
        surface.restore();
    }
}
