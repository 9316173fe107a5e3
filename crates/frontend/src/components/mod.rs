//! Reusable UI components.

mod field_input;
mod result_panel;

pub use field_input::FieldInput;
pub use result_panel::ResultPanel;
