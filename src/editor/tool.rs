use serde::{Deserialize, Serialize};

/// How pointer input on the canvas is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Select,
    Hand,
    Pencil,
    Rectangle,
    Ellipse,
    Arrow,
    Text,
    Image,
    Eraser,
}

impl Tool {
    pub const ALL: [Tool; 9] = [
        Tool::Select,
        Tool::Hand,
        Tool::Pencil,
        Tool::Rectangle,
        Tool::Ellipse,
        Tool::Arrow,
        Tool::Text,
        Tool::Image,
        Tool::Eraser,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Hand => "Hand",
            Tool::Pencil => "Pencil",
            Tool::Rectangle => "Rectangle",
            Tool::Ellipse => "Ellipse",
            Tool::Arrow => "Arrow",
            Tool::Text => "Text",
            Tool::Image => "Image",
            Tool::Eraser => "Eraser",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Tool::Select => "⬈",
            Tool::Hand => "✋",
            Tool::Pencil => "✏",
            Tool::Rectangle => "⬜",
            Tool::Ellipse => "⭕",
            Tool::Arrow => "➡",
            Tool::Text => "T",
            Tool::Image => "🖼",
            Tool::Eraser => "⌫",
        }
    }

    /// Tools that create one shape per gesture.
    pub fn is_creation(&self) -> bool {
        matches!(
            self,
            Tool::Pencil | Tool::Rectangle | Tool::Ellipse | Tool::Arrow | Tool::Text
        )
    }
}
