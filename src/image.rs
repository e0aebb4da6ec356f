//! Image sources stored on image shapes: `data:<mime>;base64,<payload>` URLs
//! built from file bytes, and decoding them back into pixels for display.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use egui::ColorImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageDataError {
    #[error("not a base64 data URL")]
    NotADataUrl,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("failed to decode image: {0}")]
    Decode(#[from] ::image::ImageError),
    #[error("failed to encode image: {0}")]
    Encode(#[source] ::image::ImageError),
    #[error("image failed to load earlier: {0}")]
    Unavailable(String),
}

pub fn is_data_url(src: &str) -> bool {
    src.starts_with("data:")
}

/// Extensions offered by the image file picker.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Guesses a MIME type from a file name's extension.
pub fn mime_for_name(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => return None,
    };
    Some(mime)
}

pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Splits a base64 data URL into its MIME type and decoded bytes.
pub fn decode_data_url(src: &str) -> Result<(String, Vec<u8>), ImageDataError> {
    let rest = src.strip_prefix("data:").ok_or(ImageDataError::NotADataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(ImageDataError::NotADataUrl)?;
    let mime = header.strip_suffix(";base64").ok_or(ImageDataError::NotADataUrl)?;
    let bytes = STANDARD.decode(payload.trim())?;
    Ok((mime.to_owned(), bytes))
}

/// Decodes encoded image bytes (PNG, JPEG, ...) into RGBA pixels.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<ColorImage, ImageDataError> {
    let image = ::image::load_from_memory(bytes)?;
    let size = [image.width() as usize, image.height() as usize];
    let rgba = image.to_rgba8();
    log::debug!("Decoded image {}x{}", size[0], size[1]);
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_flat_samples().as_slice()))
}

pub fn decode_data_url_image(src: &str) -> Result<ColorImage, ImageDataError> {
    let (_, bytes) = decode_data_url(src)?;
    decode_image_bytes(&bytes)
}

/// Encodes pixels as a PNG file.
pub fn encode_png(image: &ColorImage) -> Result<Vec<u8>, ImageDataError> {
    let [width, height] = image.size;
    let rgba: Vec<u8> = image.pixels.iter().flat_map(|c| c.to_srgba_unmultiplied()).collect();
    let buffer = ::image::RgbaImage::from_raw(width as u32, height as u32, rgba)
        .ok_or_else(|| ImageDataError::Unavailable(format!("pixel buffer does not match {width}x{height}")))?;
    let mut bytes = std::io::Cursor::new(Vec::new());
    buffer
        .write_to(&mut bytes, ::image::ImageFormat::Png)
        .map_err(ImageDataError::Encode)?;
    Ok(bytes.into_inner())
}

/// Cuts `canvas_rect` (in points) out of a window screenshot and encodes it as PNG.
pub fn canvas_png(screenshot: &ColorImage, canvas_rect: egui::Rect, pixels_per_point: f32) -> Result<Vec<u8>, ImageDataError> {
    let [width, height] = screenshot.size;
    let bounds = egui::Rect::from_min_size(
        egui::Pos2::ZERO,
        egui::vec2(width as f32, height as f32) / pixels_per_point,
    );
    let canvas = screenshot.region(&canvas_rect.intersect(bounds), Some(pixels_per_point));
    encode_png(&canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        let image = ::image::RgbaImage::from_pixel(2, 3, ::image::Rgba([255, 0, 0, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image.write_to(&mut bytes, ::image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_data_url_decodes_to_pixels() {
        let url = encode_data_url(&tiny_png(), "image/png");
        assert!(url.starts_with("data:image/png;base64,"));

        let (mime, _) = decode_data_url(&url).unwrap();
        assert_eq!(mime, "image/png");

        let pixels = decode_data_url_image(&url).unwrap();
        assert_eq!(pixels.size, [2, 3]);
    }

    #[test]
    fn test_png_encode_keeps_pixels() {
        let mut pixels = ColorImage::new([3, 2], egui::Color32::WHITE);
        pixels.pixels[0] = egui::Color32::from_rgb(10, 20, 30);
        let png = encode_png(&pixels).unwrap();
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));

        let decoded = decode_image_bytes(&png).unwrap();
        assert_eq!(decoded.size, [3, 2]);
        assert_eq!(decoded.pixels[0], egui::Color32::from_rgb(10, 20, 30));
        assert_eq!(decoded.pixels[5], egui::Color32::WHITE);
    }

    #[test]
    fn test_canvas_png_crops_to_canvas() {
        let mut screenshot = ColorImage::new([8, 6], egui::Color32::BLACK);
        // Canvas at (1, 1)-(3, 2) points, 2 pixels per point.
        for y in 2..4 {
            for x in 2..6 {
                screenshot.pixels[y * 8 + x] = egui::Color32::RED;
            }
        }
        let canvas = egui::Rect::from_min_max(egui::pos2(1.0, 1.0), egui::pos2(3.0, 2.0));
        let png = canvas_png(&screenshot, canvas, 2.0).unwrap();

        let decoded = decode_image_bytes(&png).unwrap();
        assert_eq!(decoded.size, [4, 2]);
        assert!(decoded.pixels.iter().all(|c| *c == egui::Color32::RED));
    }

    #[test]
    fn test_remote_url_is_rejected() {
        assert!(matches!(
            decode_data_url("https://example.com/cat.png"),
            Err(ImageDataError::NotADataUrl)
        ));
    }

    #[test]
    fn test_mime_for_name() {
        assert_eq!(mime_for_name("photo.JPG"), Some("image/jpeg"));
        assert_eq!(mime_for_name("notes.txt"), None);
        assert_eq!(mime_for_name("noext"), None);
    }
}
