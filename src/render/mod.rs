//! Rendering module for converting documents to output formats.

pub mod docx;
mod json;
mod options;
mod result;
mod text;

pub use docx::{to_docx_bytes, write_docx, BaseDocument};
pub use json::{to_json, JsonFormat};
pub use options::{RenderOptions, DEFAULT_DPI};
pub use result::{RenderResult, RenderStats};
pub use text::to_text;
