//! Main conversion pipeline for HTML to Org.
//!
//! This module implements the conversion entry points and the recursive tree
//! walker that renders DOM nodes as Org markup.

#![allow(
    clippy::struct_excessive_bools,
    clippy::too_many_lines,
    clippy::format_push_string,
    clippy::match_same_arms,
    clippy::option_if_let_else,
    clippy::needless_pass_by_value
)]

use std::collections::HashSet;
use std::io::Read;
use std::mem;

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::anchors::collect_fragment_targets;
use super::dom;
use super::element::{ElementKind, is_block_level};
use super::link::normalize_link;
use super::table::TableContext;
use crate::error::{ConversionError, Result};
use crate::options::ConversionOptions;
use crate::text;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Label given to links whose content had to be hoisted out of the link.
const LINK_PLACEHOLDER: &str = "Link";

/// Elements nested deeper than this are rendered as plain text.
const MAX_NESTING_DEPTH: usize = 256;

/// Input types rendered as `#+begin_input` blocks. A missing type is `unknown`.
const RENDERED_INPUT_TYPES: [&str; 3] = ["text", "number", "password"];

/// Parse an HTML document. A leading byte-order mark is ignored.
pub fn parse_html(html: &str) -> RcDom {
    let html = html.strip_prefix('\u{feff}').unwrap_or(html);
    parse_document(RcDom::default(), ParseOpts::default()).one(html)
}

/// Converts HTML to Org markup using the provided options.
///
/// This is the main entry point for conversion.
///
/// # Errors
///
/// Fails when a link cannot be normalized; no partial output is returned.
pub fn convert(html: &str, options: &ConversionOptions) -> Result<String> {
    convert_document(&parse_html(html), options)
}

/// Converts raw HTML bytes. A UTF-8 byte-order mark is stripped and invalid
/// UTF-8 sequences are replaced.
///
/// # Errors
///
/// Fails when the parser cannot consume the input or a link cannot be
/// normalized.
pub fn convert_bytes(bytes: &[u8], options: &ConversionOptions) -> Result<String> {
    let mut input = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut input)
        .map_err(|err| ConversionError::ParseError(err.to_string()))?;
    convert_document(&dom, options)
}

/// Reads all of `reader` and converts it.
///
/// # Errors
///
/// Fails when reading fails, or for any reason [`convert_bytes`] fails.
pub fn convert_reader<R: Read>(mut reader: R, options: &ConversionOptions) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    convert_bytes(&bytes, options)
}

/// Converts a pre-parsed document.
///
/// # Errors
///
/// Fails when a link cannot be normalized.
pub fn convert_document(dom: &RcDom, options: &ConversionOptions) -> Result<String> {
    convert_node(&dom.document, options)
}

/// Converts the subtree rooted at `root`.
///
/// In-page link targets are collected from the same subtree first.
///
/// # Errors
///
/// Fails when a link cannot be normalized.
pub fn convert_node(root: &Handle, options: &ConversionOptions) -> Result<String> {
    let anchors = collect_fragment_targets(root);
    let mut ctx = Context::new(options, &anchors);
    ctx.walk(root)?;
    Ok(text::normalize_output(&ctx.output))
}

fn form_identifier(counter: usize) -> String {
    format!("org-form-id--{counter}")
}

/// Conversion context that tracks state during HTML to Org conversion.
///
/// One context renders one document. Subtrees that have to be inspected
/// before they are placed (link labels, headings, list items, table cells) are
/// rendered by an isolated child context; only the finished string and the
/// form counter flow back into the parent.
pub(crate) struct Context<'a> {
    output: String,
    /// Written after every newline, e.g. the indentation under a bullet.
    prefix: String,
    /// Cells of the table currently being captured in pretty table mode.
    table: Option<TableContext>,
    options: &'a ConversionOptions,
    /// Fragment names referenced by in-page links.
    anchors: &'a HashSet<String>,
    ends_with_newline: bool,
    /// Set by block containers so a following container does not add a
    /// second line break.
    just_closed_block: bool,
    blockquote_level: usize,
    /// Characters written since the last newline, excluding the prefix.
    line_length: usize,
    /// Verbatim mode: text is written without whitespace collapsing.
    is_preformatted: bool,
    is_in_form: bool,
    form_counter: usize,
    /// Counter value of the enclosing form.
    form_id: usize,
    /// Item number of the enclosing ordered list.
    list_counter: Option<usize>,
    /// Number of enclosing elements being rendered.
    depth: usize,
}

impl<'a> Context<'a> {
    fn new(options: &'a ConversionOptions, anchors: &'a HashSet<String>) -> Self {
        Self {
            output: String::new(),
            prefix: String::new(),
            table: None,
            options,
            anchors,
            ends_with_newline: false,
            just_closed_block: false,
            blockquote_level: 0,
            line_length: 0,
            is_preformatted: false,
            is_in_form: false,
            form_counter: 0,
            form_id: 0,
            list_counter: None,
            depth: 0,
        }
    }

    /// A child context with its own buffer, sharing options and anchors.
    fn isolated(&self) -> Context<'a> {
        Context {
            is_preformatted: self.is_preformatted,
            is_in_form: self.is_in_form,
            form_counter: self.form_counter,
            form_id: self.form_id,
            depth: self.depth,
            ..Context::new(self.options, self.anchors)
        }
    }

    /// Fold the state a child context advanced back into this one.
    fn absorb(&mut self, child: &Context<'_>) {
        self.form_counter = self.form_counter.max(child.form_counter);
    }

    fn render_children_isolated(&mut self, node: &Handle) -> Result<String> {
        let mut child = self.isolated();
        child.walk_children(node)?;
        self.absorb(&child);
        Ok(child.output)
    }

    /// Recursively walk a DOM node.
    fn walk(&mut self, node: &Handle) -> Result<()> {
        match &node.data {
            NodeData::Document => self.walk_children(node),
            NodeData::Element { .. } if self.depth >= MAX_NESTING_DEPTH => {
                log::debug!("nesting deeper than {MAX_NESTING_DEPTH} elements, rendering as text");
                self.emit(&text::collapse_whitespace(&dom::deep_text(node)));
                Ok(())
            }
            NodeData::Element { .. } => {
                self.depth += 1;
                let result = self.handle_element(node);
                self.depth -= 1;
                result
            }
            NodeData::Text { contents } => {
                let raw = contents.borrow().to_string();
                if self.is_preformatted {
                    self.emit(&raw);
                } else {
                    self.emit(&text::collapse_whitespace(&raw));
                }
                Ok(())
            }
            NodeData::Doctype { .. } | NodeData::Comment { .. } | NodeData::ProcessingInstruction { .. } => Ok(()),
        }
    }

    fn walk_children(&mut self, node: &Handle) -> Result<()> {
        for child in node.children.borrow().iter() {
            self.walk(child)?;
        }
        Ok(())
    }

    fn handle_element(&mut self, node: &Handle) -> Result<()> {
        let Some(kind) = dom::tag_name(node).map(ElementKind::from_tag) else {
            return Ok(());
        };
        let start = self.output.len();

        match kind {
            ElementKind::LineBreak => self.emit("\n"),
            ElementKind::Heading(level) => self.handle_heading(node, level)?,
            ElementKind::Blockquote => self.handle_blockquote(node)?,
            ElementKind::BlockContainer => {
                self.ensure_line_start();
                self.walk_children(node)?;
                if !self.just_closed_block {
                    self.emit("\n");
                }
                self.just_closed_block = true;
            }
            ElementKind::Paragraph => self.handle_paragraph(node)?,
            ElementKind::UnorderedList => {
                let outer = self.list_counter.take();
                let result = self.handle_paragraph(node);
                self.list_counter = outer;
                result?;
            }
            ElementKind::OrderedList => {
                let start_at = dom::attr(node, "start")
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(1);
                let outer = self.list_counter.replace(start_at.saturating_sub(1));
                let result = self.handle_paragraph(node);
                self.list_counter = outer;
                result?;
            }
            ElementKind::ListItem => self.handle_list_item(node)?,
            ElementKind::DefinitionTerm => {
                let term = text::flatten(&self.render_children_isolated(node)?);
                if !term.is_empty() {
                    self.ensure_line_start();
                    self.emit(&format!("*{term}*"));
                    self.emit("\n");
                }
            }
            ElementKind::DefinitionDescription => {
                self.ensure_line_start();
                self.walk_children(node)?;
                self.ensure_line_start();
            }
            ElementKind::Emphasis(delimiter) => {
                let content = self.render_children_isolated(node)?;
                let content = text::trim_html_whitespace(&content);
                if !content.is_empty() {
                    self.emit(&format!("{delimiter}{content}{delimiter}"));
                }
            }
            ElementKind::Anchor => self.handle_anchor(node)?,
            ElementKind::Image => self.handle_image(node)?,
            ElementKind::Preformatted => self.handle_preformatted(node)?,
            ElementKind::InlineCode => self.handle_inline_code(node)?,
            ElementKind::HorizontalRule => {
                self.ensure_line_start();
                self.emit("-----\n");
            }
            ElementKind::Table
            | ElementKind::TableFooter
            | ElementKind::TableRow
            | ElementKind::TableHeaderCell
            | ElementKind::TableDataCell => {
                if self.options.pretty_tables {
                    self.handle_table_element(node, kind)?;
                } else {
                    self.handle_plain_table_element(node, kind)?;
                }
            }
            ElementKind::Title => {
                let title = text::flatten(&self.render_children_isolated(node)?);
                if !title.is_empty() {
                    self.ensure_line_start();
                    self.emit(&format!("#+TITLE: {title}\n\n\n"));
                }
            }
            ElementKind::Noscript => self.handle_noscript(node)?,
            ElementKind::Form => self.handle_form(node)?,
            ElementKind::Input => self.handle_input(node),
            ElementKind::TextArea => self.handle_textarea(node)?,
            ElementKind::Ignored => {}
            ElementKind::Other => self.walk_children(node)?,
        }

        if self.options.show_internal_anchors {
            self.mark_internal_anchor(node, start);
        }
        Ok(())
    }

    fn handle_heading(&mut self, node: &Handle, level: usize) -> Result<()> {
        let content = text::flatten(&self.render_children_isolated(node)?);
        if !content.is_empty() {
            self.emit(&format!("\n{} {content}\n", "*".repeat(level)));
        }
        Ok(())
    }

    fn handle_blockquote(&mut self, node: &Handle) -> Result<()> {
        self.blockquote_level += 1;
        self.emit("\n");
        if self.blockquote_level == 1 {
            self.emit("\n#+begin_quote\n");
        }
        let result = self.walk_children(node);
        if result.is_ok() && self.blockquote_level == 1 {
            self.emit("\n#+end_quote\n");
        }
        self.blockquote_level -= 1;
        result?;
        self.emit("\n\n");
        Ok(())
    }

    /// Renders node children surrounded by blank lines.
    fn handle_paragraph(&mut self, node: &Handle) -> Result<()> {
        self.emit("\n\n");
        self.walk_children(node)?;
        self.emit("\n\n");
        Ok(())
    }

    fn handle_list_item(&mut self, node: &Handle) -> Result<()> {
        let rendered = self.render_children_isolated(node)?;
        let content = text::collapse_blank_lines(text::trim_html_whitespace(&rendered)).into_owned();
        if content.is_empty() {
            return Ok(());
        }

        self.ensure_line_start();
        let bullet = match self.list_counter.as_mut() {
            Some(number) => {
                *number += 1;
                format!("{number}. ")
            }
            None => "- ".to_string(),
        };
        self.emit(&bullet);

        let outer_prefix = self.prefix.clone();
        self.prefix.push_str(&" ".repeat(bullet.len()));
        self.emit(&content);
        self.prefix = outer_prefix;
        self.emit("\n");
        Ok(())
    }

    fn handle_anchor(&mut self, node: &Handle) -> Result<()> {
        let href = if self.options.omit_links {
            String::new()
        } else {
            normalize_link(&dom::attr_or_empty(node, "href"), self.options)?
        };

        let children: Vec<Handle> = node.children.borrow().clone();
        let sole_child = if children.len() == 1 { children.first() } else { None };
        let sole_image_alt = sole_child
            .filter(|child| dom::tag_name(child) == Some("img"))
            .map(|image| dom::attr_or_empty(image, "alt"))
            .filter(|alt| !alt.is_empty());

        let label = if let Some(raw) = sole_child.and_then(dom::text_contents) {
            text::flatten(&raw)
        } else if let Some(alt) = sole_image_alt {
            // The image keeps its own markup; its alt text labels the link.
            self.walk_children(node)?;
            alt
        } else if dom::any_descendant(node, &is_block_level) {
            // Block content cannot live inside a link label: place it before
            // the link on one line.
            let rendered = self.render_children_isolated(node)?;
            let flat = text::flatten(&rendered);
            if !flat.is_empty() {
                if rendered.trim_start_matches(' ').starts_with('\n') {
                    self.ensure_line_start();
                }
                self.emit(&format!("{flat} "));
            }
            if href.is_empty() {
                String::new()
            } else {
                LINK_PLACEHOLDER.to_string()
            }
        } else {
            let rendered = self.render_children_isolated(node)?;
            text::trim_html_whitespace(&rendered).to_string()
        };

        let markup = match (label.is_empty(), href.is_empty()) {
            (true, true) => return Ok(()),
            _ if label == href => format!("[[{label}]]"),
            (false, false) => format!("[[{href}][{label}]]"),
            (false, true) => label,
            (true, false) => format!("[[{href}]]"),
        };
        self.emit(&markup);
        Ok(())
    }

    fn handle_image(&mut self, node: &Handle) -> Result<()> {
        let src = normalize_link(&dom::attr_or_empty(node, "src"), self.options)?;
        if src.is_empty() {
            return Ok(());
        }
        let alt = text::flatten(&dom::attr_or_empty(node, "alt"));
        if alt.is_empty() {
            self.emit(&format!("[[{src}]]"));
        } else {
            self.ensure_line_start();
            self.emit(&format!("#+CAPTION: {alt}\n[[{src}]]\n"));
        }
        Ok(())
    }

    fn handle_preformatted(&mut self, node: &Handle) -> Result<()> {
        if self.is_preformatted {
            return self.walk_children(node);
        }

        self.ensure_line_start();
        match source_language(node) {
            Some(language) => self.emit(&format!("#+begin_src {language}\n")),
            None => self.emit("#+begin_src\n"),
        }

        self.is_preformatted = true;
        let result = self.walk_children(node);
        self.is_preformatted = false;
        result?;

        if !self.ends_with_newline {
            self.emit("\n");
        }
        self.emit("#+end_src\n");
        Ok(())
    }

    fn handle_inline_code(&mut self, node: &Handle) -> Result<()> {
        if self.is_preformatted {
            return self.walk_children(node);
        }

        let rendered = self.render_children_isolated(node)?;
        let content = text::trim_html_whitespace(&rendered);
        if content.is_empty() {
            return Ok(());
        }
        if content.contains('\n') {
            self.ensure_line_start();
            self.emit(&format!("#+begin_src\n{content}\n#+end_src\n"));
        } else {
            self.emit(&format!("~{content}~"));
        }
        Ok(())
    }

    /// Tables outside pretty mode: cells on a row are separated by a space
    /// and every row ends its line.
    fn handle_plain_table_element(&mut self, node: &Handle, kind: ElementKind) -> Result<()> {
        match kind {
            ElementKind::Table => self.handle_paragraph(node),
            ElementKind::TableRow => {
                self.walk_children(node)?;
                self.ensure_line_start();
                Ok(())
            }
            ElementKind::TableHeaderCell | ElementKind::TableDataCell => {
                if self.line_length > 0 {
                    self.emit(" ");
                }
                self.walk_children(node)
            }
            _ => self.walk_children(node),
        }
    }

    /// Only invoked when pretty tables are active.
    fn handle_table_element(&mut self, node: &Handle, kind: ElementKind) -> Result<()> {
        if kind != ElementKind::Table && self.table.is_none() {
            return self.walk_children(node);
        }

        match kind {
            ElementKind::Table => {
                self.emit("\n\n");

                let outer = self.table.replace(TableContext::default());
                let result = self.walk_children(node);
                let captured = mem::replace(&mut self.table, outer);
                result?;

                if let Some(table) = captured {
                    let rendered = table.render(&self.options.table_style());
                    self.emit(&rendered);
                }
                self.emit("\n\n");
            }
            ElementKind::TableFooter => {
                let outer = self.table.as_mut().map(|table| mem::replace(&mut table.in_footer, true));
                let result = self.walk_children(node);
                if let (Some(table), Some(outer)) = (self.table.as_mut(), outer) {
                    table.in_footer = outer;
                }
                result?;
            }
            ElementKind::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    table.open_row();
                }
                self.walk_children(node)?;
                if let Some(table) = self.table.as_mut() {
                    table.close_row();
                }
            }
            ElementKind::TableHeaderCell => {
                let cell = self.render_cell(node)?;
                if let Some(table) = self.table.as_mut() {
                    table.push_header_cell(cell);
                }
            }
            ElementKind::TableDataCell => {
                let cell = self.render_cell(node)?;
                if let Some(table) = self.table.as_mut() {
                    table.push_data_cell(cell);
                }
            }
            _ => self.walk_children(node)?,
        }
        Ok(())
    }

    /// Render each direct child independently and join the results, breaking
    /// the line after block-level children.
    fn render_cell(&mut self, node: &Handle) -> Result<String> {
        let children = node.children.borrow();
        let mut cell = String::new();
        for (idx, child) in children.iter().enumerate() {
            let mut child_ctx = self.isolated();
            child_ctx.walk(child)?;
            self.absorb(&child_ctx);
            cell.push_str(&text::normalize_output(&child_ctx.output));

            let breaks_line = dom::tag_name(child).is_some_and(is_block_level);
            if breaks_line && idx + 1 < children.len() {
                cell.push('\n');
            }
        }
        Ok(cell)
    }

    fn handle_noscript(&mut self, node: &Handle) -> Result<()> {
        if !self.options.show_noscript {
            return Ok(());
        }
        let first = node.children.borrow().first().cloned();
        let Some(raw) = first.as_ref().and_then(dom::text_contents) else {
            return Ok(());
        };

        log::debug!("rendering noscript content as a separate document ({} bytes)", raw.len());
        let dom = parse_html(&raw);
        let anchors = collect_fragment_targets(&dom.document);
        let mut child = Context::new(self.options, &anchors);
        child.form_counter = self.form_counter;
        child.depth = self.depth;
        child.walk(&dom.document)?;
        self.absorb(&child);
        let rendered = text::normalize_output(&child.output);
        if !rendered.is_empty() {
            self.ensure_line_start();
            self.emit(&rendered);
            self.emit("\n");
        }
        Ok(())
    }

    fn handle_form(&mut self, node: &Handle) -> Result<()> {
        let method = dom::attr_or_empty(node, "method").trim().to_ascii_lowercase();
        let method = if method.is_empty() { "get".to_string() } else { method };

        let action = dom::attr_or_empty(node, "action");
        let action = if action.trim().is_empty() {
            self.options.base_url().unwrap_or_default().to_string()
        } else {
            action
        };
        let action = normalize_link(&action, self.options)?;

        self.form_counter += 1;
        let id = self.form_counter;
        let outer = (self.is_in_form, self.form_id);
        self.is_in_form = true;
        self.form_id = id;
        let result = self.walk_children(node);
        (self.is_in_form, self.form_id) = outer;
        result?;

        self.ensure_line_start();
        self.emit(&format!("[[org-form:{}:{method}:{action}][Submit]]\n", form_identifier(id)));
        Ok(())
    }

    /// Header arguments tying a field to its enclosing form. Every field
    /// inside a form takes a fresh counter value as its id.
    fn form_field_arguments(&mut self, node: &Handle) -> String {
        if !self.is_in_form {
            return String::new();
        }
        self.form_counter += 1;
        let mut arguments = format!(
            " :id {} :form {}",
            form_identifier(self.form_counter),
            form_identifier(self.form_id)
        );
        let name = dom::attr_or_empty(node, "name");
        if !name.is_empty() {
            arguments.push_str(" :name ");
            arguments.push_str(&name);
        }
        arguments
    }

    fn handle_input(&mut self, node: &Handle) {
        let input_type = dom::attr_or_empty(node, "type").trim().to_ascii_lowercase();
        let input_type = if input_type.is_empty() {
            "unknown".to_string()
        } else if RENDERED_INPUT_TYPES.contains(&input_type.as_str()) {
            input_type
        } else {
            log::debug!("skipping input of type {input_type:?}");
            return;
        };

        let value = dom::attr_or_empty(node, "value");
        let content = if value.is_empty() {
            dom::attr_or_empty(node, "placeholder")
        } else {
            value
        };

        let arguments = self.form_field_arguments(node);
        self.ensure_line_start();
        self.emit(&format!("#+begin_input :type {input_type}{arguments}\n{content}\n#+end_input\n"));
    }

    fn handle_textarea(&mut self, node: &Handle) -> Result<()> {
        let mut child = self.isolated();
        child.is_preformatted = true;
        child.walk_children(node)?;
        self.absorb(&child);

        let entered = child.output.trim_end_matches(['\n', '\r']);
        let content = if entered.trim().is_empty() {
            dom::attr_or_empty(node, "placeholder")
        } else {
            entered.to_string()
        };

        let arguments = self.form_field_arguments(node);
        self.ensure_line_start();
        self.emit(&format!("#+begin_textarea{arguments}\n{content}\n#+end_textarea\n"));
        Ok(())
    }

    /// Inject a `<<name>>` target when the element is referenced by an
    /// in-page link. A target for an element that ended its output with a line
    /// break goes before that break.
    fn mark_internal_anchor(&mut self, node: &Handle, start: usize) {
        let Some(name) = ["id", "name"]
            .into_iter()
            .filter_map(|key| dom::attr(node, key))
            .find(|value| !value.is_empty() && self.anchors.contains(value))
        else {
            return;
        };
        let target = format!("<<{name}>>");

        if self.output.len() > start && self.ends_with_newline {
            let insert_at = start + self.output[start..].trim_end_matches(['\n', ' ']).len();
            let needs_space = insert_at > 0 && !self.output[..insert_at].ends_with(char::is_whitespace);
            let inserted = if needs_space { format!(" {target}") } else { target };
            self.output.insert_str(insert_at, &inserted);
            return;
        }

        if self.line_length > 0 && !self.output.ends_with(char::is_whitespace) {
            self.emit(" ");
        }
        self.emit(&target);
    }

    fn ensure_line_start(&mut self) {
        if self.line_length > 0 {
            self.emit("\n");
        }
    }

    /// Append `data` to the output.
    ///
    /// Outside verbatim mode, spaces at the start of a line are dropped and,
    /// inside block quotes with wrapping enabled, long lines are broken.
    fn emit(&mut self, data: &str) {
        let data = if self.is_preformatted || self.line_length > 0 {
            data
        } else {
            data.trim_start_matches(' ')
        };
        if data.is_empty() {
            return;
        }
        self.just_closed_block = false;

        if self.blockquote_level > 0 && self.options.break_long_lines && !self.is_preformatted {
            for piece in text::wrap_to_width(data, self.line_length, text::MAX_LINE_LENGTH) {
                self.write(&piece);
            }
        } else {
            self.write(data);
        }
    }

    fn write(&mut self, data: &str) {
        for c in data.chars() {
            self.output.push(c);
            if c == '\n' {
                self.line_length = 0;
                self.output.push_str(&self.prefix);
            } else {
                self.line_length += 1;
            }
        }
        self.ends_with_newline = data.ends_with('\n');
    }
}

/// Language named by a `language-*` or `lang-*` class on a `pre` element or
/// its sole `code` child.
fn source_language(node: &Handle) -> Option<String> {
    let children = node.children.borrow();
    let code_child = match children.as_slice() {
        [only] if dom::tag_name(only) == Some("code") => Some(only.clone()),
        _ => None,
    };

    std::iter::once(node.clone())
        .chain(code_child)
        .flat_map(|element| dom::classes(&element))
        .find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
                .filter(|language| !language.is_empty())
                .map(str::to_string)
        })
}
