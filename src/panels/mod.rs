mod central_panel;
mod popups;
mod tools_panel;

pub use central_panel::central_panel;
pub use popups::popups;
pub use tools_panel::tools_panel;
