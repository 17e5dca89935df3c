//! Report output: Markdown/JSON documents and text charts.

pub mod charts;
pub mod generator;

pub use charts::{ChartSink, TextChartSink};
pub use generator::{generate_json_report, generate_markdown_report, write_output};
