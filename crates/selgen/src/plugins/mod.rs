//! Built-in plugins.

pub mod field_name;
pub mod model_column;
pub mod selective;

pub use field_name::{ExtractedField, FieldShape, extract_field};
pub use model_column::ModelColumnPlugin;
pub use selective::SelectiveEnhancedPlugin;
