use egui::Vec2;
use serde_json::{Map, Value};

use super::Element;
use super::common::Transform;
use crate::surface::Surface;

/// A persisted shape of a kind this build does not know.
///
/// The original object is carried untouched so an export writes it back;
/// only the placement fields are tracked so page-level moves stay coherent.
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueShape {
    pub transform: Transform,
    kind: String,
    raw: Map<String, Value>,
}

fn number_field(raw: &Map<String, Value>, key: &str) -> f32 {
    raw.get(key).and_then(Value::as_f64).unwrap_or(0.0) as f32
}

impl OpaqueShape {
    pub fn new(kind: impl Into<String>, raw: Map<String, Value>) -> Self {
        let transform = stored_placement(&raw);
        Self { transform, kind: kind.into(), raw }
    }

    /// The tag found on the persisted object (possibly empty).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The persisted object with the current placement merged back in.
    ///
    /// Only placement fields that changed are rewritten, so an untouched
    /// shape exports exactly as it was read.
    pub fn to_value(&self) -> Value {
        let mut raw = self.raw.clone();
        let stored = stored_placement(&self.raw);
        if self.transform.x != stored.x {
            raw.insert("x".to_owned(), Value::from(self.transform.x));
        }
        if self.transform.y != stored.y {
            raw.insert("y".to_owned(), Value::from(self.transform.y));
        }
        if self.transform.angle != stored.angle {
            raw.insert("angle".to_owned(), Value::from(self.transform.angle));
        }
        Value::Object(raw)
    }
}

fn stored_placement(raw: &Map<String, Value>) -> Transform {
    Transform::new(number_field(raw, "x"), number_field(raw, "y"), number_field(raw, "angle"))
}

impl Element for OpaqueShape {
    fn element_type(&self) -> &'static str {
        "opaque"
    }

    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    fn size(&self) -> Vec2 {
        Vec2::new(
            number_field(&self.raw, "width").max(0.0),
            number_field(&self.raw, "height").max(0.0),
        )
    }

    fn set_size(&mut self, _size: Vec2) {}

    fn local_contains(&self, _local: Vec2) -> bool {
        false
    }

    fn is_inert(&self) -> bool {
        true
    }

    fn draw(&self, _surface: &mut dyn Surface) {}
}
