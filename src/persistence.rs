//! JSON import and export of the page list.
//!
//! The same encoding backs undo/redo snapshots, file save/load and the
//! eframe app storage.

use serde_json::Value;
use thiserror::Error;

use crate::document::{Document, Page};
use crate::shape::{Shape, ShapeError};

/// Errors that can occur while saving or loading a whiteboard
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Malformed whiteboard JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to access whiteboard file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid shape {index} on page {page}: {source}")]
    InvalidShape {
        page: usize,
        index: usize,
        #[source]
        source: ShapeError,
    },
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Encodes pages as the persisted array of `{bgColor, shapes}` objects.
pub fn pages_to_value(pages: &[Page]) -> PersistenceResult<Value> {
    let pages = pages
        .iter()
        .enumerate()
        .map(|(page_index, page)| {
            let shapes = page
                .shapes
                .iter()
                .enumerate()
                .map(|(index, shape)| {
                    shape.to_json().map_err(|source| PersistenceError::InvalidShape {
                        page: page_index,
                        index,
                        source,
                    })
                })
                .collect::<PersistenceResult<Vec<_>>>()?;
            let mut object = serde_json::Map::new();
            object.insert("bgColor".to_owned(), Value::from(page.bg_color.clone()));
            object.insert("shapes".to_owned(), Value::Array(shapes));
            Ok(Value::Object(object))
        })
        .collect::<PersistenceResult<Vec<_>>>()?;
    Ok(Value::Array(pages))
}

/// Rebuilds pages from their persisted form.
///
/// Anything that is not a non-empty array yields a single blank page. A bare
/// array of shapes (the older single-page format) becomes one page.
pub fn pages_from_value(value: Value) -> PersistenceResult<Vec<Page>> {
    let items = match value {
        Value::Array(items) if !items.is_empty() => items,
        _ => {
            log::warn!("Whiteboard data is not a page list, starting from a blank page");
            return Ok(vec![Page::blank()]);
        }
    };

    if items.iter().any(is_shape_object) {
        log::info!("Loading single-page shape list");
        let shapes = shapes_from_values(0, items)?;
        return Ok(vec![Page { shapes, ..Page::blank() }]);
    }

    items
        .into_iter()
        .enumerate()
        .map(|(page_index, item)| page_from_value(page_index, item))
        .collect()
}

fn is_shape_object(value: &Value) -> bool {
    value.get("kind").is_some() || value.get("type").is_some()
}

fn page_from_value(page_index: usize, value: Value) -> PersistenceResult<Page> {
    let Value::Object(mut object) = value else {
        log::warn!("Page {page_index} is not an object, replacing it with a blank page");
        return Ok(Page::blank());
    };
    let mut page = Page::blank();
    if let Some(Value::String(color)) = object.remove("bgColor") {
        page.bg_color = color;
    }
    match object.remove("shapes") {
        Some(Value::Array(shapes)) => page.shapes = shapes_from_values(page_index, shapes)?,
        Some(_) => log::warn!("Page {page_index} has no shape list"),
        None => {}
    }
    Ok(page)
}

fn shapes_from_values(page: usize, values: Vec<Value>) -> PersistenceResult<Vec<Shape>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            Shape::from_json(value).map_err(|source| PersistenceError::InvalidShape { page, index, source })
        })
        .collect()
}

/// Serializes every page of the document to a JSON string.
pub fn export_json(document: &Document) -> PersistenceResult<String> {
    let value = pages_to_value(document.pages())?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Parses a JSON string into pages without touching any document.
pub fn import_json(json: &str) -> PersistenceResult<Vec<Page>> {
    let value: Value = serde_json::from_str(json)?;
    pages_from_value(value)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_to_file(document: &Document, path: impl AsRef<std::path::Path>) -> PersistenceResult<()> {
    let path = path.as_ref();
    std::fs::write(path, export_json(document)?)?;
    log::info!("Saved whiteboard to {}", path.display());
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_from_file(path: impl AsRef<std::path::Path>) -> PersistenceResult<Vec<Page>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let pages = import_json(&json)?;
    log::info!("Loaded {} page(s) from {}", pages.len(), path.display());
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_mismatch_gives_blank_page() {
        for json in ["{}", "[]", "42", "\"pages\""] {
            let pages = import_json(json).unwrap();
            assert_eq!(pages, vec![Page::blank()], "input {json}");
        }
    }

    #[test]
    fn test_parse_failure_is_error() {
        assert!(matches!(import_json("[{"), Err(PersistenceError::Json(_))));
    }

    #[test]
    fn test_flat_shape_list_is_one_page() {
        let pages = import_json(r#"[{"type":"rect","x":0,"y":0,"w":10,"h":10}]"#).unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].shapes.len(), 1);
        assert_eq!(pages[0].shapes[0].kind(), "rectangle");
    }
}
