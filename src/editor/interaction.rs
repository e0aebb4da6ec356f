use egui::{Pos2, Vec2};

use crate::geometry::Corner;
use crate::id_generator::ShapeId;

/// The gesture in progress between pointer-down and pointer-up.
///
/// Screen-space fields are noted; everything else is logical.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// `start` and `initial_pan` are in screen space.
    Panning { start: Pos2, initial_pan: Vec2 },
    MarqueeSelecting { anchor: Pos2, current: Pos2 },
    /// Offsets are pointer minus each member's center.
    GroupMoving { offsets: Vec<(ShapeId, Vec2)> },
    Resizing { id: ShapeId, corner: Corner },
    Rotating { id: ShapeId },
    MovingSingle { id: ShapeId, offset: Vec2 },
    DrawingFreehand { points: Vec<Pos2> },
    DrawingShape { id: ShapeId, start: Pos2 },
    DrawingArrow { start: Pos2, current: Pos2 },
    Erasing,
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Idle => "idle",
            Interaction::Panning { .. } => "panning",
            Interaction::MarqueeSelecting { .. } => "marquee",
            Interaction::GroupMoving { .. } => "group_moving",
            Interaction::Resizing { .. } => "resizing",
            Interaction::Rotating { .. } => "rotating",
            Interaction::MovingSingle { .. } => "moving",
            Interaction::DrawingFreehand { .. } => "drawing_freehand",
            Interaction::DrawingShape { .. } => "drawing_shape",
            Interaction::DrawingArrow { .. } => "drawing_arrow",
            Interaction::Erasing => "erasing",
        }
    }
}
