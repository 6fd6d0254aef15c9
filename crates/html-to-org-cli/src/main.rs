//! Command-line front end for html-to-org.
//!
//! Reads HTML from a file or stdin, converts it to Org markup and writes the
//! result to stdout or a file.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use encoding_rs::Encoding;
use html_to_org::{ConversionOptions, convert};
use log::{LevelFilter, debug, info};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Convert HTML documents to Org-mode markup.
#[derive(Parser, Debug)]
#[command(name = "html-to-org", author, version, about, disable_version_flag = true)]
struct Cli {
    /// Input HTML file; `-` or nothing reads stdin
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Input HTML file (same as the positional argument)
    #[arg(short = 'i', long = "input", value_name = "FILE", conflicts_with = "file")]
    input: Option<PathBuf>,

    /// Write output to this file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Base URL used to resolve relative links
    #[arg(short = 'u', long = "base-url", value_name = "URL")]
    base_url: Option<String>,

    /// JSON file with conversion options; command-line flags override it
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Render tables as aligned pipe tables
    #[arg(long)]
    pretty_tables: bool,

    /// With --pretty-tables, keep the ASCII borders instead of Org table syntax
    #[arg(long)]
    no_org_tables: bool,

    /// Keep link text but drop link targets
    #[arg(long)]
    omit_links: bool,

    /// Wrap long lines inside block quotes
    #[arg(long)]
    break_long_lines: bool,

    /// Render the content of <noscript> elements
    #[arg(long)]
    show_noscript: bool,

    /// Emit <<name>> targets for elements referenced by in-page links
    #[arg(long)]
    show_internal_anchors: bool,

    /// Do not shorten long data: URLs
    #[arg(long)]
    show_full_data_urls: bool,

    /// Character encoding of the input (default: UTF-8, or the encoding named by a byte-order mark)
    #[arg(long, value_name = "LABEL")]
    encoding: Option<String>,

    /// Enable verbose debug logging
    #[arg(long)]
    verbose: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

impl Cli {
    fn input_path(&self) -> Option<&Path> {
        self.input
            .as_deref()
            .or(self.file.as_deref())
            .filter(|path| *path != Path::new("-"))
    }

    /// Options from `--config`, with explicit flags applied on top.
    fn conversion_options(&self) -> Result<ConversionOptions> {
        let mut options = match &self.config {
            Some(path) => {
                info!("Loading options from {}", path.display());
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                serde_json::from_str(&raw).with_context(|| format!("Invalid config file {}", path.display()))?
            }
            None => ConversionOptions::default(),
        };

        if let Some(base_url) = &self.base_url {
            options = options.with_base_url(base_url.clone());
        }
        if self.pretty_tables {
            options.pretty_tables = true;
        }
        if self.no_org_tables {
            let mut style = options.pretty_tables_options.take().unwrap_or_default();
            style.org_format = false;
            options.pretty_tables_options = Some(style);
        }
        options.omit_links |= self.omit_links;
        options.break_long_lines |= self.break_long_lines;
        options.show_noscript |= self.show_noscript;
        options.show_internal_anchors |= self.show_internal_anchors;
        options.show_full_data_urls |= self.show_full_data_urls;

        Ok(options)
    }
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => fs::read(path).with_context(|| format!("Error reading file {}", path.display())),
        None => {
            let mut bytes = Vec::new();
            io::stdin()
                .read_to_end(&mut bytes)
                .context("Error reading from stdin")?;
            Ok(bytes)
        }
    }
}

/// Decode raw input. A byte-order mark takes precedence over the requested
/// encoding.
fn decode_input(bytes: &[u8], label: Option<&str>) -> Result<String> {
    let encoding = match label {
        Some(label) => match Encoding::for_label(label.trim().as_bytes()) {
            Some(encoding) => encoding,
            None => bail!("Unknown encoding: {label}"),
        },
        None => encoding_rs::UTF_8,
    };

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        log::warn!("input contained byte sequences that are invalid in {}", used.name());
    }
    debug!("decoded {} bytes as {}", bytes.len(), used.name());
    Ok(text.into_owned())
}

fn write_output(path: Option<&Path>, org: &str) -> Result<()> {
    let mut rendered = org.to_string();
    if !rendered.is_empty() {
        rendered.push('\n');
    }

    match path {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("Error writing file {}", path.display()))?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes()).context("Error writing to stdout")?;
            stdout.flush().context("Error writing to stdout")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let options = cli.conversion_options()?;
    let bytes = read_input(cli.input_path())?;
    let html = decode_input(&bytes, cli.encoding.as_deref())?;

    let org = convert(&html, &options).context("Conversion failed")?;
    write_output(cli.output.as_deref(), &org)
}
