//! High-performance HTML to Org-mode converter.
//!
//! Parses an HTML document with `html5ever` and renders it as Org markup:
//! headings become outline stars, links become `[[target][label]]`, code and
//! quotes become `#+begin_src`/`#+begin_quote` blocks, and tables become
//! either plain text rows or aligned pipe tables.
//!
//! ```
//! use html_to_org::{ConversionOptions, convert};
//!
//! let org = convert("<h1>Title</h1><p>Some <b>bold</b> text</p>", &ConversionOptions::default())?;
//! assert_eq!(org, "* Title\n\nSome *bold* text");
//! # Ok::<(), html_to_org::ConversionError>(())
//! ```
//!
//! Conversion is single threaded and holds no global state; independent
//! conversions may run concurrently on separate threads.

pub mod converter;
pub mod error;
pub mod options;
mod table_writer;
mod text;

pub use converter::{
    collect_fragment_targets, convert, convert_bytes, convert_document, convert_node, convert_reader,
    normalize_link, parse_html,
};
pub use error::{ConversionError, Result};
pub use options::{
    Alignment, Borders, ConversionOptions, DEFAULT_COLUMN_WIDTH, DEFAULT_DATA_URL_MAX_LENGTH, PrettyTablesOptions,
};
