//! The element vocabulary the traversal engine dispatches on.

/// Element types with dedicated rendering rules.
///
/// Anything not listed maps to [`ElementKind::Other`] and is rendered by
/// recursing into its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ElementKind {
    LineBreak,
    Heading(usize),
    Blockquote,
    BlockContainer,
    Paragraph,
    UnorderedList,
    OrderedList,
    ListItem,
    DefinitionTerm,
    DefinitionDescription,
    /// Inline emphasis, carrying its delimiter character.
    Emphasis(char),
    Anchor,
    Image,
    Preformatted,
    /// Inline code-like elements (`code`, `tt`, `kbd`, `samp`, `var`).
    InlineCode,
    HorizontalRule,
    Table,
    TableFooter,
    TableRow,
    TableHeaderCell,
    TableDataCell,
    Title,
    Noscript,
    Form,
    Input,
    TextArea,
    /// Metadata and script-like elements whose subtree is never rendered.
    Ignored,
    Other,
}

impl ElementKind {
    /// Classify a lower-case local tag name.
    pub(crate) fn from_tag(name: &str) -> Self {
        match name {
            "br" => Self::LineBreak,
            "h1" => Self::Heading(1),
            "h2" => Self::Heading(2),
            "h3" => Self::Heading(3),
            "h4" => Self::Heading(4),
            "h5" => Self::Heading(5),
            "h6" => Self::Heading(6),
            "blockquote" => Self::Blockquote,
            "div" | "section" | "article" | "header" | "footer" | "nav" | "aside" | "main" | "figure"
            | "figcaption" | "address" | "details" | "summary" | "fieldset" | "hgroup" | "center" => {
                Self::BlockContainer
            }
            "p" => Self::Paragraph,
            "ul" | "menu" => Self::UnorderedList,
            "ol" => Self::OrderedList,
            "li" => Self::ListItem,
            "dt" => Self::DefinitionTerm,
            "dd" => Self::DefinitionDescription,
            "b" | "strong" => Self::Emphasis('*'),
            "i" | "em" => Self::Emphasis('/'),
            "a" => Self::Anchor,
            "img" => Self::Image,
            "pre" => Self::Preformatted,
            "code" | "tt" | "kbd" | "samp" | "var" => Self::InlineCode,
            "hr" => Self::HorizontalRule,
            "table" => Self::Table,
            "tfoot" => Self::TableFooter,
            "tr" => Self::TableRow,
            "th" => Self::TableHeaderCell,
            "td" => Self::TableDataCell,
            "title" => Self::Title,
            "noscript" => Self::Noscript,
            "form" => Self::Form,
            "input" => Self::Input,
            "textarea" => Self::TextArea,
            "style" | "script" | "meta" | "link" | "base" | "template" => Self::Ignored,
            _ => Self::Other,
        }
    }
}

/// Block-level elements, after which a table cell inserts a line break
/// before the next child's text.
pub(crate) fn is_block_level(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "details"
            | "dialog"
            | "dd"
            | "div"
            | "dl"
            | "dt"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "header"
            | "hgroup"
            | "hr"
            | "li"
            | "main"
            | "nav"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "table"
            | "ul"
    )
}
