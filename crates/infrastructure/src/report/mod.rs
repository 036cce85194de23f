//! Report rendering and output.

mod text;
mod writer;

pub use text::render_text;
pub use writer::{render_json, write_report};
