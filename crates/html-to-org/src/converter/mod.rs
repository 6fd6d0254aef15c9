//! HTML to Org conversion.
//!
//! The converter walks an `html5ever` document tree once, writing Org markup
//! into a single buffer. In-page link targets are collected in a separate pass
//! before rendering starts.

pub mod anchors;
mod dom;
mod element;
pub mod link;
mod main;
mod table;

pub use anchors::collect_fragment_targets;
pub use link::normalize_link;
pub use main::{convert, convert_bytes, convert_document, convert_node, convert_reader, parse_html};
