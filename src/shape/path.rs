use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use super::common::{self, Transform, default_stroke_color, default_stroke_width};
use crate::surface::Surface;

/// Freehand polyline. Points are stored relative to the center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreehandPath {
    #[serde(flatten)]
    pub transform: Transform,
    #[serde(alias = "w")]
    pub width: f32,
    #[serde(alias = "h")]
    pub height: f32,
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    #[serde(default)]
    pub points: Vec<Pos2>,
}

impl FreehandPath {
    /// Builds a path from points in logical space.
    ///
    /// The center is the middle of the points' bounding box, passed through
    /// `snap` (grid snapping or identity) before the points are re-expressed
    /// relative to it. Returns `None` for an empty point list.
    pub fn from_global_points(
        points: &[Pos2],
        snap: impl Fn(Pos2) -> Pos2,
        stroke_color: &str,
        stroke_width: f32,
    ) -> Option<Self> {
        let bounds = common::calculate_bounds(points)?;
        let center = snap(bounds.center());
        Some(Self {
            transform: Transform::new(center.x, center.y, 0.0),
            width: bounds.width(),
            height: bounds.height(),
            stroke_color: stroke_color.to_owned(),
            stroke_width,
            points: points.iter().map(|p| (*p - center).to_pos2()).collect(),
        })
    }

    /// Multiplies every stored local point by `(rx, ry)`.
    pub fn scale_points(&mut self, rx: f32, ry: f32) {
        for point in &mut self.points {
            point.x *= rx;
            point.y *= ry;
        }
    }
}

impl Element for FreehandPath {
    fn element_type(&self) -> &'static str {
        "path"
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
        if self.points.len() < 2 {
            return;
        }
        surface.save();
        surface.translate(self.transform.x, self.transform.y);
        surface.rotate(self.transform.angle);
        surface.polyline(&self.points, &self.stroke_color, self.stroke_width);
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_global_points_recenters() {
        let points = [Pos2::new(10.0, 10.0), Pos2::new(30.0, 50.0), Pos2::new(20.0, 20.0)];
        let path = FreehandPath::from_global_points(&points, |p| p, "#000", 2.0).unwrap();

        assert_eq!(path.center(), Pos2::new(20.0, 30.0));
        assert_eq!(path.width, 20.0);
        assert_eq!(path.height, 40.0);
        assert_eq!(path.points[0], Pos2::new(-10.0, -20.0));
        assert_eq!(path.points[1], Pos2::new(10.0, 20.0));
    }

    #[test]
    fn test_from_global_points_empty() {
        assert!(FreehandPath::from_global_points(&[], |p| p, "#000", 2.0).is_none());
    }

    #[test]
    fn test_scale_points() {
        let points = [Pos2::new(0.0, 0.0), Pos2::new(10.0, 20.0)];
        let mut path = FreehandPath::from_global_points(&points, |p| p, "#000", 2.0).unwrap();
        path.scale_points(2.0, 0.5);
        assert_eq!(path.points[0], Pos2::new(-10.0, -5.0));
        assert_eq!(path.points[1], Pos2::new(10.0, 5.0));
    }
}
