//! Configuration for HTML to Org conversion.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Data URLs longer than this are shortened unless full display is requested.
pub const DEFAULT_DATA_URL_MAX_LENGTH: usize = 100;

/// Default maximum cell width used when wrapping table cells.
pub const DEFAULT_COLUMN_WIDTH: usize = 30;

/// Cell alignment for the ASCII table formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Alignment {
    /// Headers and footers are centered, numeric body cells are right
    /// aligned and everything else is left aligned.
    #[default]
    Default,
    /// Left aligned.
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
}

/// Which outer borders the ASCII table formatter draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Borders {
    /// Draw the left border.
    pub left: bool,
    /// Draw the right border.
    pub right: bool,
    /// Draw the top border line.
    pub top: bool,
    /// Draw the bottom border line.
    pub bottom: bool,
}

impl Default for Borders {
    fn default() -> Self {
        Self {
            left: true,
            right: true,
            top: true,
            bottom: true,
        }
    }
}

/// Style overrides for pretty table rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PrettyTablesOptions {
    /// Upper-case header and footer cells and replace underscores with spaces.
    pub auto_format_header: bool,
    /// Wrap cell text longer than `col_width` on word boundaries.
    pub auto_wrap_text: bool,
    /// Maximum cell width when `auto_wrap_text` is on.
    pub col_width: usize,
    /// Separator between columns.
    pub column_separator: char,
    /// Character used for horizontal rules.
    pub row_separator: char,
    /// Character used where rules cross column separators.
    pub center_separator: char,
    /// Alignment of header cells.
    pub header_alignment: Alignment,
    /// Alignment of footer cells.
    pub footer_alignment: Alignment,
    /// Alignment of body cells.
    pub alignment: Alignment,
    /// Per-column alignment of body cells. Entries other than
    /// [`Alignment::Default`] take precedence over `alignment`.
    pub column_alignment: Vec<Alignment>,
    /// Draw a rule below the header.
    pub header_line: bool,
    /// Draw a rule between body rows.
    pub row_line: bool,
    /// Outer borders.
    pub borders: Borders,
    /// Post-process the ASCII table into an Org pipe table.
    pub org_format: bool,
}

impl Default for PrettyTablesOptions {
    fn default() -> Self {
        Self {
            auto_format_header: true,
            auto_wrap_text: false,
            col_width: DEFAULT_COLUMN_WIDTH,
            column_separator: '|',
            row_separator: '-',
            center_separator: '+',
            header_alignment: Alignment::Default,
            footer_alignment: Alignment::Default,
            alignment: Alignment::Default,
            column_alignment: Vec::new(),
            header_line: true,
            row_line: false,
            borders: Borders::default(),
            org_format: true,
        }
    }
}

/// Main conversion options.
///
/// All toggles are independent. The defaults produce plain-text tables,
/// emit links, leave long lines alone and hide `noscript` content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConversionOptions {
    /// Render tables through the ASCII table formatter.
    pub pretty_tables: bool,
    /// Style overrides for pretty tables. `None` uses the defaults.
    pub pretty_tables_options: Option<PrettyTablesOptions>,
    /// Drop link targets and keep only link text.
    pub omit_links: bool,
    /// Wrap long lines inside block quotes.
    pub break_long_lines: bool,
    /// Resolve relative links against this URL.
    pub base_url: Option<String>,
    /// Render the content of `noscript` elements.
    pub show_noscript: bool,
    /// Emit `<<name>>` targets for elements referenced by in-page links.
    pub show_internal_anchors: bool,
    /// Keep data URLs intact instead of shortening them.
    pub show_full_data_urls: bool,
    /// Data URLs longer than this many bytes are shortened.
    pub data_url_max_length: usize,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            pretty_tables: false,
            pretty_tables_options: None,
            omit_links: false,
            break_long_lines: false,
            base_url: None,
            show_noscript: false,
            show_internal_anchors: false,
            show_full_data_urls: false,
            data_url_max_length: DEFAULT_DATA_URL_MAX_LENGTH,
        }
    }
}

impl ConversionOptions {
    /// Enable pretty tables.
    #[must_use]
    pub const fn with_pretty_tables(mut self, enabled: bool) -> Self {
        self.pretty_tables = enabled;
        self
    }

    /// Enable pretty tables with explicit style overrides.
    #[must_use]
    pub fn with_pretty_tables_options(mut self, table_options: PrettyTablesOptions) -> Self {
        self.pretty_tables = true;
        self.pretty_tables_options = Some(table_options);
        self
    }

    /// Drop link targets.
    #[must_use]
    pub const fn with_omit_links(mut self, enabled: bool) -> Self {
        self.omit_links = enabled;
        self
    }

    /// Wrap long lines inside block quotes.
    #[must_use]
    pub const fn with_break_long_lines(mut self, enabled: bool) -> Self {
        self.break_long_lines = enabled;
        self
    }

    /// Resolve relative links against `base_url`. An empty string clears it.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = if base_url.is_empty() { None } else { Some(base_url) };
        self
    }

    /// Render `noscript` content.
    #[must_use]
    pub const fn with_show_noscript(mut self, enabled: bool) -> Self {
        self.show_noscript = enabled;
        self
    }

    /// Emit internal link targets.
    #[must_use]
    pub const fn with_show_internal_anchors(mut self, enabled: bool) -> Self {
        self.show_internal_anchors = enabled;
        self
    }

    /// Keep data URLs intact.
    #[must_use]
    pub const fn with_show_full_data_urls(mut self, enabled: bool) -> Self {
        self.show_full_data_urls = enabled;
        self
    }

    /// The configured base URL, treating an empty string as unset.
    pub(crate) fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Table style in effect for pretty tables.
    pub(crate) fn table_style(&self) -> PrettyTablesOptions {
        self.pretty_tables_options.clone().unwrap_or_default()
    }
}
