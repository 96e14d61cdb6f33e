//! Presentation of evaluation results. Rounding happens here and nowhere
//! upstream.

pub mod console;
pub mod json;
pub mod markdown;

pub use json::write_json;
pub use markdown::{render_markdown, write_markdown};
