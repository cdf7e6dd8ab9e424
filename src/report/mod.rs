//! Report rendering and tabular export.

pub mod export;
pub mod generator;

pub use export::export_csv;
pub use generator::{generate_console_summary, generate_json_report, generate_markdown_report};
