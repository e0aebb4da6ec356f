use egui::Color32;

use crate::renderer::parse_color;

/// `#rrggbb` (or `#rrggbbaa` when translucent) for a color.
pub fn to_css_hex(color: Color32) -> String {
    if color.is_opaque() {
        return format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b());
    }
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
}

/// Color picker bound to a CSS color string. Returns true when it changed.
pub fn css_color_edit(ui: &mut egui::Ui, label: &str, css: &mut String) -> bool {
    let mut color = parse_color(css);
    let changed = ui
        .horizontal(|ui| {
            ui.label(label);
            egui::color_picker::color_edit_button_srgba(ui, &mut color, egui::color_picker::Alpha::Opaque)
                .changed()
        })
        .inner;
    if changed {
        *css = to_css_hex(color);
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        for css in ["#3d52d5", "#70d6ff", "#ffecd1"] {
            assert_eq!(to_css_hex(parse_color(css)), css);
        }
        assert_eq!(to_css_hex(Color32::WHITE), "#ffffff");
    }
}
