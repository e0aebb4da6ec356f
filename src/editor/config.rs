use egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::hit_testing::{CORNER_HANDLE_TOLERANCE, ERASER_RADIUS, ROTATION_HANDLE_TOLERANCE};
use crate::shape::text::DEFAULT_FONT_SIZE;

/// Styling applied to newly created shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeStyle {
    pub stroke_color: String,
    pub fill_color: String,
    pub stroke_width: f32,
    pub text_color: String,
    pub font_size: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke_color: "#3D52D5".to_owned(),
            fill_color: "#70d6ff".to_owned(),
            stroke_width: 2.0,
            text_color: "#000".to_owned(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// Editor settings, persisted with the app state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub grid_size: f32,
    /// Snap shape centers to the grid while creating and moving.
    pub snap_to_grid: bool,
    pub eraser_radius: f32,
    /// Corner handle pick distance in screen pixels.
    pub corner_tolerance: f32,
    /// Rotation handle pick distance in screen pixels.
    pub rotate_tolerance: f32,
    /// Logical extent the pan is clamped to.
    pub content_size: Vec2,
    /// Maximum undo depth; 0 keeps everything.
    pub history_limit: usize,
    /// Return to the select tool after a shape has been created.
    pub auto_revert_to_select: bool,
    pub style: ShapeStyle,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: 20.0,
            snap_to_grid: true,
            eraser_radius: ERASER_RADIUS,
            corner_tolerance: CORNER_HANDLE_TOLERANCE,
            rotate_tolerance: ROTATION_HANDLE_TOLERANCE,
            content_size: Vec2::new(2000.0, 2000.0),
            history_limit: 100,
            auto_revert_to_select: true,
            style: ShapeStyle::default(),
        }
    }
}
