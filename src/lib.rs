#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod components;
pub mod document;
pub mod editor;
pub mod file_handler;
pub mod geometry;
pub mod history;
pub mod id_generator;
pub mod image;
pub mod input;
pub mod panels;
pub mod persistence;
pub mod renderer;
pub mod shape;
pub mod surface;
pub mod texture_manager;

pub use app::WhiteboardApp;
pub use document::{Document, Page};
pub use editor::{Editor, EditorConfig, PointerOutcome, Selection, TextEditRequest, Tool};
pub use history::{History, Snapshot};
pub use id_generator::ShapeId;
pub use persistence::{PersistenceError, export_json, import_json};
pub use renderer::Renderer;
pub use shape::{Element, ElementType, Shape, ShapeError, factory};
pub use surface::{MonospaceMeasure, Surface, TextMeasure};
