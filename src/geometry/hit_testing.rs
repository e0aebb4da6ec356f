use egui::{CursorIcon, Pos2, Rect, Vec2};

use crate::shape::{Element, Shape};

/// Pick distance around a corner handle (screen pixels).
pub const CORNER_HANDLE_TOLERANCE: f32 = 10.0;
/// Pick distance around the rotation handle (screen pixels).
pub const ROTATION_HANDLE_TOLERANCE: f32 = 12.0;
/// Gap between the top edge and the rotation handle (logical units).
pub const ROTATION_HANDLE_OFFSET: f32 = 20.0;
pub const ERASER_RADIUS: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Same order as [`Element::corners`].
    pub const ALL: [Corner; 4] = [Corner::TopLeft, Corner::TopRight, Corner::BottomLeft, Corner::BottomRight];

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            Corner::TopLeft => CursorIcon::ResizeNwSe,
            Corner::TopRight => CursorIcon::ResizeNeSw,
            Corner::BottomLeft => CursorIcon::ResizeNeSw,
            Corner::BottomRight => CursorIcon::ResizeNwSe,
        }
    }

    pub fn is_left(&self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// A manipulation handle of the single selection under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleHit {
    Corner(Corner),
    Rotate,
}

/// Logical position of the rotation handle, above the top edge.
pub fn rotation_handle_position(shape: &dyn Element) -> Pos2 {
    let half_height = shape.size().y / 2.0;
    shape.local_to_global(Vec2::new(0.0, -half_height - ROTATION_HANDLE_OFFSET))
}

/// Tests the corners first, then the rotation handle.
///
/// Corners use a square in the shape's local frame, the rotation handle a
/// circle. Tolerances are in the same units as `p`.
pub fn hit_handle(shape: &dyn Element, p: Pos2, corner_tolerance: f32, rotate_tolerance: f32) -> Option<HandleHit> {
    let local = shape.global_to_local(p);
    let half = shape.size() / 2.0;
    let corner = Corner::ALL
        .into_iter()
        .find(|corner| {
            let cx = if corner.is_left() { -half.x } else { half.x };
            let cy = if corner.is_top() { -half.y } else { half.y };
            (local.x - cx).abs() < corner_tolerance && (local.y - cy).abs() < corner_tolerance
        })
        .map(HandleHit::Corner);

    corner.or_else(|| {
        (rotation_handle_position(shape).distance(p) <= rotate_tolerance).then_some(HandleHit::Rotate)
    })
}

/// Index of the topmost live shape containing `p`.
pub fn topmost_hit(shapes: &[Shape], p: Pos2) -> Option<usize> {
    shapes
        .iter()
        .rposition(|shape| !shape.element.is_inert() && shape.element.contains(p))
}

/// Whether the eraser at `p` touches the shape: inside it, or within
/// `radius` of one of its rotated corners.
pub fn eraser_touches(shape: &dyn Element, p: Pos2, radius: f32) -> bool {
    if shape.is_inert() {
        return false;
    }
    shape.contains(p) || shape.corners().iter().any(|corner| corner.distance(p) <= radius)
}

/// Whether the shape's bounding box lies entirely within `marquee`.
pub fn inside_marquee(shape: &dyn Element, marquee: Rect) -> bool {
    !shape.is_inert() && marquee.contains_rect(shape.bounding_box())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::factory;

    fn rect_at(x: f32, y: f32, w: f32, h: f32) -> Shape {
        factory::create_rectangle(Pos2::new(x, y), Vec2::new(w, h), "#fff", "#000", 2.0)
    }

    #[test]
    fn test_hit_handle_corner_before_rotation() {
        let shape = rect_at(100.0, 100.0, 40.0, 20.0);
        let hit = hit_handle(&shape.element, Pos2::new(82.0, 92.0), 10.0, 12.0);
        assert_eq!(hit, Some(HandleHit::Corner(Corner::TopLeft)));

        let hit = hit_handle(&shape.element, Pos2::new(100.0, 70.0), 10.0, 12.0);
        assert_eq!(hit, Some(HandleHit::Rotate));

        assert_eq!(hit_handle(&shape.element, Pos2::new(100.0, 100.0), 10.0, 12.0), None);
    }

    #[test]
    fn test_corner_handle_is_a_square() {
        let shape = rect_at(100.0, 100.0, 40.0, 20.0);
        // 9 units off on both axes: outside a radius of 10, inside the square.
        let hit = hit_handle(&shape.element, Pos2::new(89.0, 99.0), 10.0, 12.0);
        assert_eq!(hit, Some(HandleHit::Corner(Corner::TopLeft)));
        assert_eq!(hit_handle(&shape.element, Pos2::new(90.0, 99.0), 10.0, 12.0), None);
    }

    #[test]
    fn test_corner_square_follows_rotation() {
        let mut shape = rect_at(0.0, 0.0, 100.0, 20.0);
        shape.element.set_angle(std::f32::consts::FRAC_PI_2);
        // Local bottom-right (50, 10) rotates to (-10, 50).
        let hit = hit_handle(&shape.element, Pos2::new(-2.0, 58.0), 10.0, 12.0);
        assert_eq!(hit, Some(HandleHit::Corner(Corner::BottomRight)));
    }

    #[test]
    fn test_topmost_hit_prefers_last() {
        let shapes = vec![rect_at(0.0, 0.0, 50.0, 50.0), rect_at(10.0, 10.0, 50.0, 50.0)];
        assert_eq!(topmost_hit(&shapes, Pos2::new(5.0, 5.0)), Some(1));
        assert_eq!(topmost_hit(&shapes, Pos2::new(-20.0, -20.0)), Some(0));
        assert_eq!(topmost_hit(&shapes, Pos2::new(200.0, 200.0)), None);
    }

    #[test]
    fn test_eraser_rotated_corner() {
        let mut shape = rect_at(0.0, 0.0, 100.0, 20.0);
        shape.element.set_angle(std::f32::consts::FRAC_PI_2);
        // The top-left corner (-50, -10) rotates to (10, -50).
        assert!(eraser_touches(&shape.element, Pos2::new(10.0, -65.0), 20.0));
        assert!(!eraser_touches(&shape.element, Pos2::new(-50.0, -30.0), 20.0));
    }

    #[test]
    fn test_marquee_requires_full_containment() {
        let shape = rect_at(50.0, 50.0, 20.0, 20.0);
        let fits = Rect::from_min_max(Pos2::new(30.0, 30.0), Pos2::new(80.0, 80.0));
        let overlaps = Rect::from_min_max(Pos2::new(45.0, 45.0), Pos2::new(80.0, 80.0));
        assert!(inside_marquee(&shape.element, fits));
        assert!(!inside_marquee(&shape.element, overlaps));
    }
}
