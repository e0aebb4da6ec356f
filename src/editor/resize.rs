use egui::{Pos2, Vec2};

use crate::geometry::Corner;
use crate::shape::common::sanitize_ratio;
use crate::shape::{Element, ElementType};
use crate::surface::TextMeasure;

/// Drags `corner` of the shape's local box to `pointer` (logical space).
///
/// The dragged edges follow the pointer in the local frame; crossing the
/// opposite edge flips the box. Content is scaled by the box ratios and the
/// center moves so the untouched corner stays put under rotation.
pub fn resize_to_pointer(element: &mut ElementType, corner: Corner, pointer: Pos2, measure: &dyn TextMeasure) {
    let local = element.global_to_local(pointer);
    let old_size = element.size();
    let half = old_size / 2.0;
    let (mut left, mut right, mut top, mut bottom) = (-half.x, half.x, -half.y, half.y);

    if corner.is_left() {
        left = local.x;
    } else {
        right = local.x;
    }
    if !element.has_fixed_height() {
        if corner.is_top() {
            top = local.y;
        } else {
            bottom = local.y;
        }
    }
    if left > right {
        std::mem::swap(&mut left, &mut right);
    }
    if top > bottom {
        std::mem::swap(&mut top, &mut bottom);
    }

    let new_size = Vec2::new(right - left, bottom - top);
    let rx = sanitize_ratio(new_size.x / old_size.x);
    let ry = sanitize_ratio(new_size.y / old_size.y);
    let new_center = element.local_to_global(Vec2::new((left + right) / 2.0, (top + bottom) / 2.0));

    element.set_size(new_size);
    element.scale_content(rx, ry, measure);
    element.set_center(new_center);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::factory;
    use crate::surface::MonospaceMeasure;

    #[test]
    fn test_drag_bottom_right_keeps_top_left() {
        let mut shape = factory::create_rectangle(Pos2::new(50.0, 50.0), Vec2::new(100.0, 100.0), "#fff", "#000", 1.0);
        resize_to_pointer(&mut shape.element, Corner::BottomRight, Pos2::new(200.0, 150.0), &MonospaceMeasure);
        assert_eq!(shape.element.size(), Vec2::new(200.0, 150.0));
        assert_eq!(shape.element.center(), Pos2::new(100.0, 75.0));
    }

    #[test]
    fn test_drag_past_opposite_edge_flips() {
        let mut shape = factory::create_rectangle(Pos2::new(0.0, 0.0), Vec2::new(100.0, 40.0), "#fff", "#000", 1.0);
        resize_to_pointer(&mut shape.element, Corner::TopLeft, Pos2::new(80.0, 30.0), &MonospaceMeasure);
        let size = shape.element.size();
        assert_eq!(size, Vec2::new(30.0, 10.0));
        assert_eq!(shape.element.center(), Pos2::new(65.0, 25.0));
        assert!(shape.element.bounding_box().width() >= 0.0);
    }

    #[test]
    fn test_collapse_keeps_finite_content() {
        let points = [Pos2::new(0.0, 0.0), Pos2::new(10.0, 10.0)];
        let mut shape = factory::create_path(&points, |p| p, "#000", 1.0).unwrap();
        resize_to_pointer(&mut shape.element, Corner::BottomRight, Pos2::new(0.0, 0.0), &MonospaceMeasure);
        resize_to_pointer(&mut shape.element, Corner::BottomRight, Pos2::new(20.0, 20.0), &MonospaceMeasure);
        let ElementType::Path(path) = &shape.element else { unreachable!() };
        assert!(path.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_arrow_keeps_band_height() {
        let mut shape = factory::create_arrow(Pos2::ZERO, 100.0, 0.0, "#000", 2.0);
        let before = shape.element.size().y;
        resize_to_pointer(&mut shape.element, Corner::BottomRight, Pos2::new(100.0, 80.0), &MonospaceMeasure);
        assert_eq!(shape.element.size().y, before);
        assert_eq!(shape.element.size().x, 150.0);
    }
}
