use crate::image;

/// Something the user dropped onto the window.
#[derive(Debug, Clone, PartialEq)]
pub enum DroppedContent {
    /// An image, encoded as a data URL.
    Image { name: String, data_url: String },
    /// A whiteboard JSON export.
    Whiteboard { name: String, json: String },
}

/// Collects dropped files and turns them into whiteboard content
#[derive(Debug, Default)]
pub struct FileHandler;

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads any files dropped this frame.
    pub fn take_dropped(&self, ctx: &egui::Context) -> Vec<DroppedContent> {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        dropped.iter().filter_map(Self::process_file).collect()
    }

    fn process_file(file: &egui::DroppedFile) -> Option<DroppedContent> {
        let name = if let Some(path) = &file.path {
            path.display().to_string()
        } else if !file.name.is_empty() {
            file.name.clone()
        } else {
            "unknown".to_owned()
        };

        let bytes = match Self::read_bytes(file) {
            Some(bytes) => bytes,
            None => {
                log::warn!("Dropped file has no accessible data: {name}");
                return None;
            }
        };
        Self::classify(&name, &file.mime, bytes)
    }

    fn read_bytes(file: &egui::DroppedFile) -> Option<Vec<u8>> {
        if let Some(bytes) = &file.bytes {
            return Some(bytes.to_vec());
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(path) = &file.path {
                return match std::fs::read(path) {
                    Ok(bytes) => Some(bytes),
                    Err(err) => {
                        log::error!("Failed to read dropped file {}: {err}", path.display());
                        None
                    }
                };
            }
        }
        None
    }

    /// Decides what a file is from its MIME type or extension.
    pub fn classify(name: &str, mime: &str, bytes: Vec<u8>) -> Option<DroppedContent> {
        let lower = name.to_ascii_lowercase();
        if mime == "application/json" || lower.ends_with(".json") {
            return match String::from_utf8(bytes) {
                Ok(json) => Some(DroppedContent::Whiteboard { name: name.to_owned(), json }),
                Err(err) => {
                    log::error!("Dropped JSON file {name} is not UTF-8: {err}");
                    None
                }
            };
        }

        let mime = if mime.starts_with("image/") { Some(mime) } else { image::mime_for_name(name) };
        match mime {
            Some(mime) => {
                log::info!("Processing dropped image {name} ({} bytes)", bytes.len());
                Some(DroppedContent::Image {
                    name: name.to_owned(),
                    data_url: image::encode_data_url(&bytes, mime),
                })
            }
            None => {
                log::warn!("Dropped file is not a supported type: {name}");
                None
            }
        }
    }
}

/// Native file dialogs.
#[cfg(not(target_arch = "wasm32"))]
pub mod dialogs {
    use super::{DroppedContent, FileHandler};
    use crate::image::IMAGE_EXTENSIONS;

    /// Asks for an image file and reads it as a data URL. `None` if cancelled.
    pub fn pick_image() -> Option<DroppedContent> {
        let path = rfd::FileDialog::new()
            .set_title("Insert image")
            .add_filter("Image", &IMAGE_EXTENSIONS)
            .pick_file()?;
        let name = path.display().to_string();
        match std::fs::read(&path) {
            Ok(bytes) => FileHandler::classify(&name, "", bytes),
            Err(err) => {
                log::error!("Failed to read image {name}: {err}");
                None
            }
        }
    }

    /// Asks where to save a PNG and writes it. Returns the chosen path.
    pub fn save_png(png: &[u8]) -> std::io::Result<Option<std::path::PathBuf>> {
        let dialog = rfd::FileDialog::new()
            .set_title("Export PNG")
            .set_file_name("whiteboard.png")
            .add_filter("PNG Image", &["png"]);
        let Some(path) = dialog.save_file() else {
            return Ok(None);
        };
        std::fs::write(&path, png)?;
        log::info!("Exported PNG to {}", path.display());
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_extension() {
        let image = FileHandler::classify("cat.png", "", vec![1, 2, 3]);
        assert!(matches!(
            image,
            Some(DroppedContent::Image { ref data_url, .. }) if data_url == "data:image/png;base64,AQID"
        ));

        let board = FileHandler::classify("board.JSON", "", b"[]".to_vec());
        assert_eq!(
            board,
            Some(DroppedContent::Whiteboard { name: "board.JSON".to_owned(), json: "[]".to_owned() })
        );

        assert_eq!(FileHandler::classify("notes.txt", "text/plain", vec![]), None);
    }

    #[test]
    fn test_same_file_dropped_twice_is_read_twice() {
        let ctx = egui::Context::default();
        let handler = FileHandler::new();
        let file = egui::DroppedFile {
            name: "board.json".to_owned(),
            bytes: Some(std::sync::Arc::from(&b"[]"[..])),
            ..Default::default()
        };

        for _ in 0..2 {
            let input = egui::RawInput { dropped_files: vec![file.clone()], ..Default::default() };
            let mut taken = Vec::new();
            let _ = ctx.run(input, |ctx| taken = handler.take_dropped(ctx));
            assert_eq!(taken.len(), 1);
        }
    }
}
