use egui::Pos2;

pub mod hit_testing;

pub use hit_testing::{Corner, HandleHit};

/// Rounds `value` to the nearest multiple of `grid`.
pub fn snap_value(value: f32, grid: f32) -> f32 {
    if grid > 0.0 { (value / grid).round() * grid } else { value }
}

pub fn snap_to_grid(p: Pos2, grid: f32) -> Pos2 {
    Pos2::new(snap_value(p.x, grid), snap_value(p.y, grid))
}

/// Rectangle spanned by two arbitrary corners, with `min ≤ max` on both axes.
pub fn normalized_rect(a: Pos2, b: Pos2) -> egui::Rect {
    egui::Rect::from_two_pos(a, b)
}
