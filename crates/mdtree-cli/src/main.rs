//! mdtree CLI - Parse Markdown into a document tree and inspect it
//!
//! Usage:
//!   mdtree [OPTIONS] <FILE>
//!
//! Formats:
//!   tree   Indented dump of every block and inline run (default)
//!   json   Document tree as JSON
//!   check  Report shapes a converter cannot express
//!   stats  Show document statistics

mod check;

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser as _, ValueEnum};
use log::{debug, LevelFilter};
use mdtree_core::lexer::split_lines;
use mdtree_core::{BlockKind, BlockRef, ChildRef, Document, Inline, ListKind, ParseResult, Parser};
use serde::Serialize;

#[derive(clap::Parser, Debug)]
#[command(name = "mdtree", version)]
#[command(about = "Parse a Markdown file into a document tree and inspect it")]
struct Cli {
    /// Markdown file to read
    file: PathBuf,

    /// What to print
    #[arg(short, long, value_enum, default_value_t = Format::Tree)]
    format: Format,

    /// Log parser decisions to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Tree,
    Json,
    Check,
    Stats,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let input = fs::read_to_string(&cli.file)
        .with_context(|| format!("failed to read '{}'", cli.file.display()))?;

    let lines = split_lines(&input);
    let result = Parser::new().parse_with_recovery(&lines);
    debug!(
        "parsed {} lines into {} blocks with {} recovery note(s)",
        lines.len(),
        result.document.len(),
        result.errors.len()
    );

    match cli.format {
        Format::Tree => print_tree(result.document.root(), 0),
        Format::Json => print_json(&result)?,
        Format::Check => print_check(&result),
        Format::Stats => print_stats(&result, &input),
    }

    Ok(())
}

// =============================================================================
// Tree Output
// =============================================================================

fn print_tree(block: BlockRef<'_, '_>, depth: usize) {
    let prefix = "  ".repeat(depth);
    for child in block.children() {
        match child {
            ChildRef::Block(b) => {
                println!("{}{}", prefix, describe_block(b));
                print_tree(b, depth + 1);
            }
            ChildRef::Inline(i) => println!("{}{}", prefix, describe_inline(i)),
        }
    }
}

fn describe_block(block: BlockRef<'_, '_>) -> String {
    let mut out = format!(
        "Block({}, level={}, line={}",
        block.kind().name(),
        block.level(),
        block.linenum()
    );
    match block.kind() {
        BlockKind::Code { info } if !info.is_empty() => {
            out.push_str(&format!(", info={:?}", info));
        }
        BlockKind::ListItem(ListKind::Check { checked }) => {
            out.push_str(&format!(", checked={}", checked));
        }
        _ => {}
    }
    out.push(')');
    out
}

fn describe_inline(inline: &Inline<'_>) -> String {
    let texts: Vec<String> = inline.texts.iter().map(|t| format!("{:?}", t)).collect();
    format!("Inline({}, [{}])", inline.kind.name(), texts.join(", "))
}

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Serialize)]
struct JsonDocument<'a> {
    children: Vec<JsonNode<'a>>,
    notes: Vec<JsonNote<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonNode<'a> {
    Block {
        kind: &'static str,
        level: u32,
        line: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        info: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        checked: Option<bool>,
        children: Vec<JsonNode<'a>>,
    },
    Inline {
        kind: &'static str,
        texts: Vec<&'a str>,
    },
}

#[derive(Serialize)]
struct JsonNote<'a> {
    line: usize,
    kind: String,
    message: &'a str,
}

fn print_json(result: &ParseResult<'_>) -> Result<()> {
    let json = JsonDocument {
        children: convert_children(result.document.root()),
        notes: result
            .errors
            .iter()
            .map(|e| JsonNote {
                line: e.line,
                kind: format!("{:?}", e.kind),
                message: &e.message,
            })
            .collect(),
    };
    let text = serde_json::to_string_pretty(&json).context("failed to serialize document")?;
    println!("{}", text);
    Ok(())
}

fn convert_children<'d>(block: BlockRef<'d, '_>) -> Vec<JsonNode<'d>> {
    block
        .children()
        .map(|child| match child {
            ChildRef::Block(b) => convert_block(b),
            ChildRef::Inline(i) => JsonNode::Inline {
                kind: i.kind.name(),
                texts: i.texts.iter().map(|t| t.as_ref()).collect(),
            },
        })
        .collect()
}

fn convert_block<'d>(block: BlockRef<'d, '_>) -> JsonNode<'d> {
    let kind = block.kind();
    JsonNode::Block {
        kind: kind.name(),
        level: block.level(),
        line: block.linenum(),
        info: match kind {
            BlockKind::Code { info } => Some(info.as_str()),
            _ => None,
        },
        checked: match kind {
            BlockKind::ListItem(ListKind::Check { checked }) => Some(*checked),
            _ => None,
        },
        children: convert_children(block),
    }
}

// =============================================================================
// Check Output
// =============================================================================

fn print_check(result: &ParseResult<'_>) {
    let diagnostics = check::check(&result.document, &result.errors);
    if diagnostics.is_empty() {
        println!("No issues found");
        return;
    }
    for diagnostic in &diagnostics {
        println!("{}", diagnostic);
    }
}

// =============================================================================
// Stats Output
// =============================================================================

fn print_stats(result: &ParseResult<'_>, input: &str) {
    let stats = DocumentStats::from_document(&result.document, input);

    println!("Document Statistics");
    println!("-------------------");
    println!("Content:");
    println!("  Total blocks:   {}", stats.total_blocks);
    println!("  Headings:       {}", stats.headings);
    println!("  Paragraphs:     {}", stats.paragraphs);
    println!("  Code blocks:    {}", stats.code_blocks);
    println!("  Lists:          {}", stats.lists);
    println!("  List items:     {}", stats.list_items);
    println!("  Quotes:         {}", stats.quotes);
    println!("  Tables:         {}", stats.tables);
    println!("  Images:         {}", stats.images);
    println!("  Comments:       {}", stats.comments);
    println!();
    println!("Size:");
    println!("  Characters:     {}", stats.chars);
    println!("  Words (est.):   {}", stats.words);
    println!("  Lines:          {}", stats.lines);
    println!();
    println!("Recovery notes: {}", result.errors.len());
}

#[derive(Debug, Default)]
struct DocumentStats {
    total_blocks: usize,
    headings: usize,
    paragraphs: usize,
    code_blocks: usize,
    lists: usize,
    list_items: usize,
    quotes: usize,
    tables: usize,
    images: usize,
    comments: usize,
    chars: usize,
    words: usize,
    lines: usize,
}

impl DocumentStats {
    fn from_document(doc: &Document<'_>, input: &str) -> Self {
        let mut stats = Self {
            chars: input.chars().count(),
            words: input.split_whitespace().count(),
            lines: input.lines().count(),
            ..Self::default()
        };

        for block in doc.blocks().skip(1) {
            stats.total_blocks += 1;
            match block.kind() {
                BlockKind::Heading => stats.headings += 1,
                BlockKind::Paragraph => stats.paragraphs += 1,
                BlockKind::Code { .. } | BlockKind::Preformatted => stats.code_blocks += 1,
                BlockKind::ListTop => stats.lists += 1,
                BlockKind::ListItem(_) => stats.list_items += 1,
                BlockKind::QuoteTop => stats.quotes += 1,
                BlockKind::TableTop => stats.tables += 1,
                BlockKind::Image => stats.images += 1,
                BlockKind::Comment => stats.comments += 1,
                _ => {}
            }
        }
        stats
    }
}
