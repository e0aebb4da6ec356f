use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

use super::Element;
use super::common::{self, Transform};
use crate::surface::Surface;

/// Default display size of an image placed on the board.
pub const DEFAULT_IMAGE_SIZE: Vec2 = Vec2::new(200.0, 150.0);

/// Raster image drawn into `width × height`, from a data URL or a remote URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(flatten)]
    pub transform: Transform,
    #[serde(alias = "w")]
    pub width: f32,
    #[serde(alias = "h")]
    pub height: f32,
    #[serde(default)]
    pub src: String,
}

impl Image {
    pub fn new(center: Pos2, size: Vec2, src: impl Into<String>) -> Self {
        Self {
            transform: Transform::new(center.x, center.y, 0.0),
            width: size.x,
            height: size.y,
            src: src.into(),
        }
    }
}

impl Element for Image {
    fn element_type(&self) -> &'static str {
        "image"
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
        surface.save();
        surface.translate(self.transform.x, self.transform.y);
        surface.rotate(self.transform.angle);
        surface.image(common::local_box(self.size()), &self.src);
        surface.restore();
    }
}
