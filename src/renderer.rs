// src/renderer.rs
use egui::epaint::{Mesh, PathShape, TextShape};
use egui::{Color32, FontId, Painter, Pos2, Rect, Shape as PaintShape, Stroke, Vec2};

use crate::editor::Editor;
use crate::geometry::hit_testing;
use crate::shape::Element;
use crate::surface::{Affine, Surface, TextMeasure};
use crate::texture_manager::TextureManager;

const SELECTION_COLOR: Color32 = Color32::from_rgb(0, 120, 215);
const HANDLE_SIZE: f32 = 8.0;
const ELLIPSE_SEGMENTS: usize = 48;
const TEXTURE_CACHE_SIZE: usize = 64;

/// Parses the CSS colors stored on shapes: `#rgb`, `#rrggbb`, `#rrggbbaa`,
/// `rgb()/rgba()` and a few names. Anything else is black.
pub fn parse_color(css: &str) -> Color32 {
    let css = css.trim();
    if let Some(hex) = css.strip_prefix('#') {
        return parse_hex(hex).unwrap_or(Color32::BLACK);
    }
    if let Some(args) = css.strip_prefix("rgba(").or_else(|| css.strip_prefix("rgb(")) {
        return parse_rgb_args(args.trim_end_matches(')')).unwrap_or(Color32::BLACK);
    }
    match css.to_ascii_lowercase().as_str() {
        "white" => Color32::WHITE,
        "red" => Color32::RED,
        "green" => Color32::GREEN,
        "blue" => Color32::BLUE,
        "yellow" => Color32::YELLOW,
        "gray" | "grey" => Color32::GRAY,
        "transparent" => Color32::TRANSPARENT,
        _ => Color32::BLACK,
    }
}

fn parse_hex(hex: &str) -> Option<Color32> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some(Color32::from_rgb(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17)),
        6 => Some(Color32::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color32::from_rgba_unmultiplied(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Color32> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |i: usize| parts.get(i)?.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0) as u8);
    let (r, g, b) = (channel(0)?, channel(1)?, channel(2)?);
    let alpha = match parts.get(3) {
        Some(a) => (a.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
        None => 255,
    };
    Some(Color32::from_rgba_unmultiplied(r, g, b, alpha))
}

/// Measures text with egui's proportional font.
pub struct EguiTextMeasure {
    ctx: egui::Context,
}

impl EguiTextMeasure {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl TextMeasure for EguiTextMeasure {
    fn measure_text_width(&self, line: &str, font_size: f32) -> f32 {
        self.ctx.fonts(|fonts| {
            fonts
                .layout_no_wrap(line.to_owned(), FontId::proportional(font_size), Color32::BLACK)
                .size()
                .x
        })
    }
}

/// [`Surface`] over an egui painter. `base` maps logical units to screen points.
pub struct EguiSurface<'a> {
    painter: &'a Painter,
    textures: &'a mut TextureManager,
    current: Affine,
    stack: Vec<Affine>,
}

impl<'a> EguiSurface<'a> {
    pub fn new(painter: &'a Painter, textures: &'a mut TextureManager, base: Affine) -> Self {
        Self { painter, textures, current: base, stack: Vec::new() }
    }

    fn map(&self, p: Pos2) -> Pos2 {
        self.current.apply(p)
    }

    fn stroke(&self, color: &str, width: f32) -> Stroke {
        Stroke::new(width * self.current.scale_factor(), parse_color(color))
    }

    fn box_corners(&self, rect: Rect) -> Vec<Pos2> {
        [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()]
            .into_iter()
            .map(|p| self.map(p))
            .collect()
    }
}

impl TextMeasure for EguiSurface<'_> {
    fn measure_text_width(&self, line: &str, font_size: f32) -> f32 {
        self.painter
            .layout_no_wrap(line.to_owned(), FontId::proportional(font_size), Color32::BLACK)
            .size()
            .x
    }
}

impl Surface for EguiSurface<'_> {
    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        if let Some(saved) = self.stack.pop() {
            self.current = saved;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.current = self.current.translated(dx, dy);
    }

    fn rotate(&mut self, angle: f32) {
        self.current = self.current.rotated(angle);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.current = self.current.scaled(sx, sy);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        let points = self.box_corners(rect);
        self.painter.add(PaintShape::convex_polygon(points, parse_color(color), Stroke::NONE));
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, width: f32) {
        let points = self.box_corners(rect);
        self.painter.add(PaintShape::closed_line(points, self.stroke(color, width)));
    }

    fn ellipse(&mut self, center: Pos2, radii: Vec2, fill: Option<&str>, stroke: Option<(&str, f32)>) {
        if radii.x <= 0.0 || radii.y <= 0.0 {
            return;
        }
        let points: Vec<Pos2> = (0..ELLIPSE_SEGMENTS)
            .map(|i| {
                let t = i as f32 / ELLIPSE_SEGMENTS as f32 * std::f32::consts::TAU;
                self.map(center + Vec2::new(radii.x * t.cos(), radii.y * t.sin()))
            })
            .collect();
        let fill = fill.map(parse_color).unwrap_or(Color32::TRANSPARENT);
        let stroke = stroke.map(|(color, width)| self.stroke(color, width)).unwrap_or(Stroke::NONE);
        self.painter.add(PathShape::convex_polygon(points, fill, stroke));
    }

    fn polyline(&mut self, points: &[Pos2], color: &str, width: f32) {
        if points.len() < 2 {
            return;
        }
        let points = points.iter().map(|p| self.map(*p)).collect();
        self.painter.add(PaintShape::line(points, self.stroke(color, width)));
    }

    fn text(&mut self, pos: Pos2, text: &str, font_size: f32, color: &str) {
        let color = parse_color(color);
        let font = FontId::proportional(font_size * self.current.scale_factor());
        let galley = self.painter.layout_no_wrap(text.to_owned(), font, color);
        let shape = TextShape::new(self.map(pos), galley, color).with_angle(self.current.rotation());
        self.painter.add(shape);
    }

    fn image(&mut self, rect: Rect, src: &str) {
        let corners = self.box_corners(rect);
        let Some(texture) = self.textures.texture_for_source(src, self.painter.ctx()) else {
            self.painter.add(PaintShape::convex_polygon(
                corners.clone(),
                Color32::from_gray(220),
                Stroke::new(1.0, Color32::GRAY),
            ));
            self.painter.add(PaintShape::line_segment([corners[0], corners[2]], Stroke::new(1.0, Color32::GRAY)));
            return;
        };
        let uvs = [Pos2::new(0.0, 0.0), Pos2::new(1.0, 0.0), Pos2::new(1.0, 1.0), Pos2::new(0.0, 1.0)];
        let mut mesh = Mesh::with_texture(texture);
        for (pos, uv) in corners.into_iter().zip(uvs) {
            mesh.colored_vertex(pos, Color32::WHITE);
            if let Some(vertex) = mesh.vertices.last_mut() {
                vertex.uv = uv;
            }
        }
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(0, 2, 3);
        self.painter.add(mesh);
    }
}

/// Draws the whiteboard canvas: background, shapes, previews and selection.
pub struct Renderer {
    textures: TextureManager,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self { textures: TextureManager::new(TEXTURE_CACHE_SIZE) }
    }

    /// Logical → screen mapping for a canvas whose top-left is `origin`.
    pub fn base_transform(editor: &Editor, origin: Pos2) -> Affine {
        let pan = editor.viewport().pan;
        let zoom = editor.zoom();
        Affine::IDENTITY
            .translated(origin.x + pan.x, origin.y + pan.y)
            .scaled(zoom, zoom)
    }

    /// Renders the current page of `editor` into `canvas` (screen space).
    pub fn render(&mut self, painter: &Painter, canvas: Rect, editor: &Editor) {
        self.textures.begin_frame();
        let page = editor.current_page();
        painter.rect_filled(canvas, 0.0, parse_color(&page.bg_color));

        let base = Self::base_transform(editor, canvas.min);
        let mut surface = EguiSurface::new(painter, &mut self.textures, base);
        for shape in page.shapes() {
            shape.element.draw(&mut surface);
        }

        let style = editor.style();
        if let Some(points) = editor.freehand_preview() {
            surface.polyline(points, &style.stroke_color, style.stroke_width);
        }
        if let Some(arrow) = editor.arrow_preview() {
            arrow.draw(&mut surface);
        }

        Self::draw_selection(painter, &base, editor);
    }

    fn draw_selection(painter: &Painter, base: &Affine, editor: &Editor) {
        let stroke = Stroke::new(1.0, SELECTION_COLOR);

        if let Some(shape) = editor.selected_shape() {
            let [tl, tr, bl, br] = shape.element.corners().map(|p| base.apply(p));
            painter.extend(PaintShape::dashed_line(&[tl, tr, br, bl, tl], stroke, 6.0, 4.0));

            for corner in [tl, tr, bl, br] {
                let handle = Rect::from_center_size(corner, Vec2::splat(HANDLE_SIZE));
                painter.rect(handle, 0.0, Color32::WHITE, stroke);
            }

            let top_mid = tl.lerp(tr, 0.5);
            let rotate = base.apply(hit_testing::rotation_handle_position(&shape.element));
            painter.line_segment([top_mid, rotate], stroke);
            painter.circle(rotate, HANDLE_SIZE / 2.0 + 1.0, Color32::WHITE, stroke);
        }

        for shape in editor.multi_selected_shapes() {
            let bbox = shape.element.bounding_box();
            let rect = Rect::from_two_pos(base.apply(bbox.min), base.apply(bbox.max));
            painter.rect_stroke(rect, 0.0, stroke);
        }

        if let Some(marquee) = editor.marquee_rect() {
            let rect = Rect::from_two_pos(base.apply(marquee.min), base.apply(marquee.max));
            painter.rect(rect, 0.0, SELECTION_COLOR.gamma_multiply(0.15), stroke);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Tool;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#000"), Color32::BLACK);
        assert_eq!(parse_color("#FFECD1"), Color32::from_rgb(0xFF, 0xEC, 0xD1));
        assert_eq!(parse_color("#ffffff80"), Color32::from_rgba_unmultiplied(255, 255, 255, 0x80));
        assert_eq!(parse_color("rgb(10, 20, 30)"), Color32::from_rgb(10, 20, 30));
        assert_eq!(parse_color("white"), Color32::WHITE);
        assert_eq!(parse_color("#zz"), Color32::BLACK);
    }

    #[test]
    fn test_render_basics() {
        let ctx = egui::Context::default();
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(400.0, 300.0));
        let painter = Painter::new(ctx, egui::LayerId::background(), rect);

        let mut editor = Editor::default();
        editor.set_snap_to_grid(false);
        for tool in [Tool::Rectangle, Tool::Ellipse, Tool::Arrow, Tool::Pencil] {
            editor.set_tool(tool);
            editor.pointer_down(Pos2::new(10.0, 10.0));
            editor.pointer_move(Pos2::new(60.0, 40.0));
            editor.pointer_up(Pos2::new(60.0, 40.0));
        }
        editor.add_image_at("https://example.com/cat.png", 100.0, 100.0);

        let mut renderer = Renderer::new();
        renderer.render(&painter, rect, &editor);
    }
}
