//! Rendering module for converting measurement tables to output formats.

mod gauge;
mod json;
mod markdown;
mod options;
mod text;

pub use gauge::{format_number, gauge_bar, split_title, Scale};
pub use json::{to_json, JsonFormat, Report, ReportRow};
pub use markdown::to_markdown;
pub use options::RenderOptions;
pub use text::to_text;
