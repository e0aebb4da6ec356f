pub mod color_edit;
pub mod tool_button;

pub use color_edit::css_color_edit;
pub use tool_button::ToolButton;
