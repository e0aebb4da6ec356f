use eframe_whiteboard::shape::{Element, ElementType, Shape, factory};
use egui::{Pos2, Vec2};
use serde_json::json;

fn rect_at(center: Pos2, size: Vec2) -> Shape {
    factory::create_rectangle(center, size, "#fff", "#000", 2.0)
}

#[test]
fn test_rectangle_contains() {
    let shape = rect_at(Pos2::new(100.0, 100.0), Vec2::new(40.0, 20.0));
    assert!(shape.element.contains(Pos2::new(100.0, 100.0)));
    assert!(shape.element.contains(Pos2::new(119.0, 100.0)));
    assert!(!shape.element.contains(Pos2::new(121.0, 100.0)));
}

#[test]
fn test_ellipse_contains() {
    let shape = factory::create_ellipse(Pos2::ZERO, Vec2::new(40.0, 20.0), "#fff", "#000", 2.0);
    assert!(shape.element.contains(Pos2::new(19.0, 0.0)));
    assert!(!shape.element.contains(Pos2::new(21.0, 0.0)));
    assert!(!shape.element.contains(Pos2::new(15.0, 8.0)));
}

#[test]
fn test_rotated_rectangle_contains() {
    let mut shape = rect_at(Pos2::new(0.0, 0.0), Vec2::new(40.0, 20.0));
    shape.element.set_angle(std::f32::consts::FRAC_PI_2);
    // After a quarter turn the long side runs along y.
    assert!(shape.element.contains(Pos2::new(0.0, 19.0)));
    assert!(!shape.element.contains(Pos2::new(19.0, 0.0)));
}

#[test]
fn test_rotation_invariance() {
    let mut shape = rect_at(Pos2::new(50.0, -20.0), Vec2::new(30.0, 10.0));
    let offset = Vec2::new(7.0, -3.0);
    let before = shape.element.global_to_local(shape.element.center() + offset);

    let theta = 0.7_f32;
    shape.element.set_angle(theta);
    let (sin, cos) = theta.sin_cos();
    let rotated = Vec2::new(offset.x * cos - offset.y * sin, offset.x * sin + offset.y * cos);
    let after = shape.element.global_to_local(shape.element.center() + rotated);

    assert!((before - after).length() < 1e-4);
}

#[test]
fn test_bounding_box_is_local_extent() {
    let mut shape = rect_at(Pos2::new(10.0, 20.0), Vec2::new(40.0, 20.0));
    let bbox = shape.element.bounding_box();
    assert_eq!(bbox.min, Pos2::new(-10.0, 10.0));
    assert_eq!(bbox.size(), Vec2::new(40.0, 20.0));

    // The box is the local extent placed at the center; rotation does not grow it.
    shape.element.set_angle(std::f32::consts::FRAC_PI_4);
    assert_eq!(shape.element.bounding_box(), bbox);
}

#[test]
fn test_arrow_contains_thin_band() {
    let arrow = factory::create_arrow_from_points(Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0), "#000", 2.0);
    assert_eq!(arrow.element.center(), Pos2::new(50.0, 0.0));
    assert!(arrow.element.contains(Pos2::new(10.0, 3.0)));
    assert!(!arrow.element.contains(Pos2::new(50.0, 30.0)));
}

#[test]
fn test_translate_moves_center_only() {
    let mut shape = rect_at(Pos2::new(10.0, 10.0), Vec2::new(4.0, 6.0));
    shape.element.translate(Vec2::new(5.0, -5.0));
    assert_eq!(shape.element.center(), Pos2::new(15.0, 5.0));
    assert_eq!(shape.element.size(), Vec2::new(4.0, 6.0));
}

#[test]
fn test_json_round_trip_every_kind() {
    let points = [Pos2::new(0.0, 0.0), Pos2::new(10.0, 5.0), Pos2::new(20.0, 0.0)];
    let shapes = vec![
        rect_at(Pos2::new(1.0, 2.0), Vec2::new(3.0, 4.0)),
        factory::create_ellipse(Pos2::new(5.0, 5.0), Vec2::new(8.0, 6.0), "#abc", "#123", 3.0),
        factory::create_arrow(Pos2::new(0.0, 0.0), 50.0, 0.5, "#f00", 2.0),
        factory::create_path(&points, |p| p, "#000", 1.0).expect("path"),
        factory::create_image(Pos2::new(100.0, 100.0), Vec2::new(200.0, 150.0), "https://example.com/a.png"),
        factory::create_text(Pos2::new(30.0, 40.0), "#000", 24.0),
    ];

    for shape in shapes {
        let value = shape.to_json().unwrap();
        let decoded = Shape::from_json(value.clone()).unwrap();
        assert_eq!(decoded, shape, "round trip changed {}", shape.kind());
        assert_ne!(decoded.id(), shape.id(), "ids are not persisted");
        assert_eq!(value["kind"], shape.kind());
    }
}

#[test]
fn test_legacy_shapes_decode() {
    let text = Shape::from_json(json!({
        "type": "text", "x": 0, "y": 0, "w": 10, "h": 5,
        "text": "hi", "strokeColor": "#f00", "fontSize": 12
    }))
    .unwrap();
    let ElementType::Text(text) = &text.element else {
        panic!("expected text");
    };
    assert_eq!(text.color, "#f00");
    // Legacy boxes below the minimum size are floored.
    assert_eq!(text.width, 50.0);
    assert_eq!(text.height, 30.0);

    let arrow = Shape::from_json(json!({ "kind": "arrow", "x": 5, "y": 5, "w": 40 })).unwrap();
    assert_eq!(arrow.element.size().x, 40.0);
}

#[test]
fn test_unknown_kind_survives_round_trip() {
    let raw = json!({ "kind": "star", "x": 3, "y": 4, "points": 5, "width": 10, "height": 10 });
    let shape = Shape::from_json(raw.clone()).unwrap();
    assert!(shape.element.is_inert());
    assert!(!shape.element.contains(Pos2::new(3.0, 4.0)));

    let back = shape.to_json().unwrap();
    assert_eq!(back["kind"], "star");
    assert_eq!(back["points"], 5);
    assert_eq!(back["x"], 3.0);
}

#[test]
fn test_known_kind_with_bad_fields_is_an_error() {
    assert!(Shape::from_json(json!({ "kind": "rectangle", "x": "left" })).is_err());
    assert!(Shape::from_json(json!(42)).is_err());
}
