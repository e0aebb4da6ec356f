use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

// Common constants for all shape types
pub const DEFAULT_STROKE_COLOR: &str = "#000";
pub const DEFAULT_STROKE_WIDTH: f32 = 2.0;
pub const DEFAULT_RECT_FILL: &str = "#ffffcc";
pub const DEFAULT_ELLIPSE_FILL: &str = "#ccffff";

pub(crate) fn default_stroke_color() -> String {
    DEFAULT_STROKE_COLOR.to_owned()
}

pub(crate) fn default_stroke_width() -> f32 {
    DEFAULT_STROKE_WIDTH
}

/// Placement of a shape: its center in document-logical units and its
/// rotation (radians) about that center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub angle: f32,
}

impl Transform {
    pub fn new(x: f32, y: f32, angle: f32) -> Self {
        Self { x, y, angle }
    }

    pub fn center(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    pub fn set_center(&mut self, center: Pos2) {
        self.x = center.x;
        self.y = center.y;
    }

    /// Rotates `p` by `-angle` around the center.
    pub fn global_to_local(&self, p: Pos2) -> Vec2 {
        rotate(p - self.center(), -self.angle)
    }

    pub fn local_to_global(&self, local: Vec2) -> Pos2 {
        self.center() + rotate(local, self.angle)
    }
}

/// Rotates a vector counter-clockwise (in a y-down frame: clockwise on screen).
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Local-frame box `[-w/2, w/2] × [-h/2, h/2]`.
pub fn local_box(size: Vec2) -> Rect {
    Rect::from_center_size(Pos2::ZERO, size)
}

pub(crate) fn local_box_contains(local: Vec2, size: Vec2) -> bool {
    let half = size / 2.0;
    local.x >= -half.x && local.x <= half.x && local.y >= -half.y && local.y <= half.y
}

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: &[Pos2]) -> Option<Rect> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for point in points {
        min = min.min(*point);
        max = max.max(*point);
    }
    Some(Rect::from_min_max(min, max))
}

/// Replaces a zero, negative or non-finite scale ratio with 1.
pub fn sanitize_ratio(ratio: f32) -> f32 {
    if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 }
}
