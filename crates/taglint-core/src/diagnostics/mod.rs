//! Diagnostics: types, collection and rendering

mod renderer;
mod types;

pub use renderer::{DiagnosticRenderer, OutputFormat};
pub use types::*;
