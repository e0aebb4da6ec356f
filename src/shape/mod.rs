use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::id_generator::{ShapeId, generate_id};
use crate::surface::{Surface, TextMeasure};

pub mod arrow;
pub mod common;
pub mod ellipse;
pub mod image;
pub mod opaque;
pub mod path;
pub mod rectangle;
pub mod text;

pub use arrow::Arrow;
pub use common::Transform;
pub use ellipse::Ellipse;
pub use image::Image;
pub use opaque::OpaqueShape;
pub use path::FreehandPath;
pub use rectangle::Rectangle;
pub use text::Text;

/// Errors raised while rebuilding a shape from persisted JSON.
#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("shape entry is not a JSON object")]
    NotAnObject,

    #[error("invalid {kind} shape: {source}")]
    Invalid {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize {kind} shape: {source}")]
    Serialize {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Geometric contract shared by every shape variant.
///
/// Each shape lives in a local frame centered on its `x, y` and rotated by
/// its `angle`; variants only describe themselves in that frame.
pub trait Element {
    /// Tag written to the `kind` field
    fn element_type(&self) -> &'static str;

    fn transform(&self) -> &Transform;

    fn transform_mut(&mut self) -> &mut Transform;

    /// Full local extents.
    fn size(&self) -> Vec2;

    fn set_size(&mut self, size: Vec2);

    /// Hit test against a point already expressed in the local frame.
    fn local_contains(&self, local: Vec2) -> bool;

    /// Draws the shape, pushing and popping its own transform.
    fn draw(&self, surface: &mut dyn Surface);

    /// Whether resizing only affects the width (the height is a hit band).
    fn has_fixed_height(&self) -> bool {
        false
    }

    /// Inert shapes are carried through persistence but never interacted with.
    fn is_inert(&self) -> bool {
        false
    }

    fn center(&self) -> Pos2 {
        self.transform().center()
    }

    fn angle(&self) -> f32 {
        self.transform().angle
    }

    fn set_center(&mut self, center: Pos2) {
        self.transform_mut().set_center(center);
    }

    fn set_angle(&mut self, angle: f32) {
        self.transform_mut().angle = angle;
    }

    fn translate(&mut self, delta: Vec2) {
        let center = self.center() + delta;
        self.set_center(center);
    }

    fn global_to_local(&self, p: Pos2) -> Vec2 {
        self.transform().global_to_local(p)
    }

    fn local_to_global(&self, local: Vec2) -> Pos2 {
        self.transform().local_to_global(local)
    }

    fn contains(&self, p: Pos2) -> bool {
        self.local_contains(self.global_to_local(p))
    }

    /// Axis-aligned box in logical space: center ± half extents.
    fn bounding_box(&self) -> Rect {
        Rect::from_center_size(self.center(), self.size())
    }

    /// The four rotated corners: top-left, top-right, bottom-left, bottom-right.
    fn corners(&self) -> [Pos2; 4] {
        let half = self.size() / 2.0;
        [
            self.local_to_global(Vec2::new(-half.x, -half.y)),
            self.local_to_global(Vec2::new(half.x, -half.y)),
            self.local_to_global(Vec2::new(-half.x, half.y)),
            self.local_to_global(Vec2::new(half.x, half.y)),
        ]
    }
}

/// Enumeration of all shape variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementType {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Arrow(Arrow),
    Path(FreehandPath),
    Image(Image),
    Text(Text),
    Opaque(OpaqueShape),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            ElementType::Rectangle($s) => $body,
            ElementType::Ellipse($s) => $body,
            ElementType::Arrow($s) => $body,
            ElementType::Path($s) => $body,
            ElementType::Image($s) => $body,
            ElementType::Text($s) => $body,
            ElementType::Opaque($s) => $body,
        }
    };
}

impl Element for ElementType {
    fn element_type(&self) -> &'static str {
        dispatch!(self, s => s.element_type())
    }

    fn transform(&self) -> &Transform {
        dispatch!(self, s => s.transform())
    }

    fn transform_mut(&mut self) -> &mut Transform {
        dispatch!(self, s => s.transform_mut())
    }

    fn size(&self) -> Vec2 {
        dispatch!(self, s => s.size())
    }

    fn set_size(&mut self, size: Vec2) {
        dispatch!(self, s => s.set_size(size))
    }

    fn local_contains(&self, local: Vec2) -> bool {
        dispatch!(self, s => s.local_contains(local))
    }

    fn draw(&self, surface: &mut dyn Surface) {
        dispatch!(self, s => s.draw(surface))
    }

    fn has_fixed_height(&self) -> bool {
        dispatch!(self, s => s.has_fixed_height())
    }

    fn is_inert(&self) -> bool {
        dispatch!(self, s => s.is_inert())
    }

    fn bounding_box(&self) -> Rect {
        dispatch!(self, s => s.bounding_box())
    }
}

impl ElementType {
    /// Applies the content scaling that follows a box resize.
    ///
    /// Text scales its font by the smaller ratio and re-measures; paths scale
    /// their stored points. Ratios are expected to be sanitized already.
    pub fn scale_content(&mut self, rx: f32, ry: f32, measure: &dyn TextMeasure) {
        match self {
            ElementType::Text(text) => {
                text.font_size *= rx.min(ry);
                text.fit_to_text(measure);
            }
            ElementType::Path(path) => path.scale_points(rx, ry),
            _ => {}
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            ElementType::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            ElementType::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A shape on a page: a variant plus its session-local identity.
///
/// Equality compares geometry and style only, never the id, so a document
/// rebuilt from JSON compares equal to the one it was exported from.
#[derive(Debug, Clone)]
pub struct Shape {
    id: ShapeId,
    pub element: ElementType,
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

impl Shape {
    pub fn new(element: ElementType) -> Self {
        Self { id: generate_id(), element }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> &'static str {
        self.element.element_type()
    }

    /// Serializes to the persisted object form, tagged with `kind`.
    pub fn to_json(&self) -> Result<Value, ShapeError> {
        let kind = self.kind();
        let value = match &self.element {
            ElementType::Rectangle(s) => serde_json::to_value(s),
            ElementType::Ellipse(s) => serde_json::to_value(s),
            ElementType::Arrow(s) => serde_json::to_value(s),
            ElementType::Path(s) => serde_json::to_value(s),
            ElementType::Image(s) => serde_json::to_value(s),
            ElementType::Text(s) => serde_json::to_value(s),
            ElementType::Opaque(s) => return Ok(s.to_value()),
        }
        .map_err(|source| ShapeError::Serialize { kind, source })?;

        match value {
            Value::Object(mut map) => {
                map.insert("kind".to_owned(), Value::from(kind));
                Ok(Value::Object(map))
            }
            _ => Err(ShapeError::NotAnObject),
        }
    }

    /// Rebuilds a shape from its persisted object form with a fresh id.
    ///
    /// The tag is read from `kind`, or `type` for older files. Unknown tags
    /// produce an inert [`OpaqueShape`]; a known tag with bad fields is an error.
    pub fn from_json(value: Value) -> Result<Self, ShapeError> {
        let Value::Object(map) = value else {
            return Err(ShapeError::NotAnObject);
        };
        let kind = map
            .get("kind")
            .or_else(|| map.get("type"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();

        fn parse<T: serde::de::DeserializeOwned>(
            kind: &str,
            map: serde_json::Map<String, Value>,
        ) -> Result<T, ShapeError> {
            serde_json::from_value(Value::Object(map)).map_err(|source| ShapeError::Invalid {
                kind: kind.to_owned(),
                source,
            })
        }

        let element = match kind.as_str() {
            "rectangle" | "rect" => ElementType::Rectangle(parse(&kind, map)?),
            "ellipse" => ElementType::Ellipse(parse(&kind, map)?),
            "arrow" => ElementType::Arrow(parse(&kind, map)?),
            "path" => ElementType::Path(parse(&kind, map)?),
            "image" => ElementType::Image(parse(&kind, map)?),
            "text" => {
                let mut text: Text = parse(&kind, map)?;
                text.apply_min_size();
                ElementType::Text(text)
            }
            _ => {
                log::warn!("Keeping shape of unknown kind {kind:?} as inert data");
                ElementType::Opaque(OpaqueShape::new(kind, map))
            }
        };
        Ok(Shape::new(element))
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Shape::from_json(value).map_err(serde::de::Error::custom)
    }
}

/// Factory functions for creating shapes with fresh ids
pub mod factory {
    use super::*;

    pub fn create_rectangle(center: Pos2, size: Vec2, fill: &str, stroke: &str, stroke_width: f32) -> Shape {
        Shape::new(ElementType::Rectangle(Rectangle::new(center, size, fill, stroke, stroke_width)))
    }

    pub fn create_ellipse(center: Pos2, size: Vec2, fill: &str, stroke: &str, stroke_width: f32) -> Shape {
        Shape::new(ElementType::Ellipse(Ellipse::new(center, size, fill, stroke, stroke_width)))
    }

    pub fn create_arrow(center: Pos2, length: f32, angle: f32, stroke: &str, stroke_width: f32) -> Shape {
        Shape::new(ElementType::Arrow(Arrow::new(center, length, angle, stroke, stroke_width)))
    }

    /// Arrow from `from` to `to`.
    pub fn create_arrow_from_points(from: Pos2, to: Pos2, stroke: &str, stroke_width: f32) -> Shape {
        Shape::new(ElementType::Arrow(Arrow::from_points(
            from.x,
            from.y,
            to.x,
            to.y,
            stroke,
            stroke_width,
        )))
    }

    /// Path through logical-space points, centered by `snap`. `None` when empty.
    pub fn create_path(
        points: &[Pos2],
        snap: impl Fn(Pos2) -> Pos2,
        stroke: &str,
        stroke_width: f32,
    ) -> Option<Shape> {
        FreehandPath::from_global_points(points, snap, stroke, stroke_width)
            .map(|path| Shape::new(ElementType::Path(path)))
    }

    pub fn create_image(center: Pos2, size: Vec2, src: impl Into<String>) -> Shape {
        Shape::new(ElementType::Image(Image::new(center, size, src)))
    }

    pub fn create_text(center: Pos2, color: &str, font_size: f32) -> Shape {
        Shape::new(ElementType::Text(Text::new(center, color, font_size)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_json_tags_kind() {
        let shape = factory::create_rectangle(Pos2::new(1.0, 2.0), Vec2::new(3.0, 4.0), "#fff", "#000", 2.0);
        let value = shape.to_json().unwrap();
        assert_eq!(value["kind"], "rectangle");
        assert_eq!(value["x"], 1.0);
        assert_eq!(value["width"], 3.0);
        assert_eq!(value["fillColor"], "#fff");
    }

    #[test]
    fn test_legacy_rect_type_tag() {
        let shape = Shape::from_json(json!({
            "type": "rect", "x": 10, "y": 20, "w": 30, "h": 40
        }))
        .unwrap();
        let ElementType::Rectangle(rect) = &shape.element else {
            panic!("expected rectangle, got {:?}", shape.element);
        };
        assert_eq!(rect.width, 30.0);
        assert_eq!(rect.height, 40.0);
        assert_eq!(rect.transform.angle, 0.0);
    }

    #[test]
    fn test_unknown_kind_is_opaque_and_preserved() {
        let raw = json!({ "kind": "star", "x": 5, "y": 6, "points": 5 });
        let mut shape = Shape::from_json(raw).unwrap();
        assert!(shape.element.is_inert());
        assert!(!shape.element.contains(Pos2::new(5.0, 6.0)));

        shape.element.translate(Vec2::new(1.0, 1.0));
        let value = shape.to_json().unwrap();
        assert_eq!(value["kind"], "star");
        assert_eq!(value["points"], 5);
        assert_eq!(value["x"], 6.0);
    }

    #[test]
    fn test_known_kind_with_bad_fields_fails() {
        let err = Shape::from_json(json!({ "kind": "ellipse", "x": "left" })).unwrap_err();
        assert!(matches!(err, ShapeError::Invalid { .. }));
    }

    #[test]
    fn test_equality_ignores_id() {
        let a = factory::create_text(Pos2::ZERO, "#000", 24.0);
        let b = factory::create_text(Pos2::ZERO, "#000", 24.0);
        assert_ne!(a.id(), b.id());
        assert_eq!(a, b);
    }
}
