//! Markdown structural codec
//!
//! Bidirectional translation between Markdown text and an owned document
//! tree, built on comrak's CommonMark parser. Parsing normalizes rather than
//! rejects: images degrade to links, raw HTML degrades to text, soft breaks
//! become spaces. Serialization is a total function with exact formatting
//! rules, because its output is the wire format for persistence and the
//! round-trip oracle for mode switches.
//!
//! # Serialization rules
//! - Heading: `#` run for the level, one space, inline content
//! - Blockquote: every line prefixed `> ` (bare `>` on blank lines)
//! - Bullet items `- `; ordered items space-padded to the widest index,
//!   preserving the list's start index
//! - Fenced code: fence one backtick longer than the longest interior run
//!   (minimum 3), language tag appended unless `plaintext`
//! - Inline code: backtick run one longer than the longest interior run,
//!   space-padded when longer than a single backtick
//! - Links: `[text](href "title")`, collapsed to `<href>` when the text is
//!   exactly the href and there is no title
//! - Emphasis `*`/`**` with surrounding whitespace expelled from the marks
//! - Hard breaks as `\` + newline, suppressed at the end of their parent
//! - Trailing whitespace trimmed from the final string

use comrak::{
    nodes::{AstNode, ListType as ComrakListType, NodeValue},
    parse_document, Arena, Options,
};

use crate::error::{Error, Result, ResultExt};

// ─────────────────────────────────────────────────────────────────────────────
// Document Tree
// ─────────────────────────────────────────────────────────────────────────────

/// A parsed markdown document: an ordered sequence of top-level blocks.
///
/// Owned by the codec during a parse/serialize cycle and never mutated in
/// place; edits produce new trees.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

/// The blocks of one list item.
pub type ListItem = Vec<Block>;

/// A block-level node.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Heading { level: u8, content: Vec<Inline> },
    Blockquote(Vec<Block>),
    BulletList(Vec<ListItem>),
    OrderedList { start: u64, items: Vec<ListItem> },
    CodeBlock { language: String, literal: String },
    HorizontalRule,
}

/// An inline node.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Code(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Link {
        href: String,
        title: Option<String>,
        content: Vec<Inline>,
    },
    HardBreak,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse markdown text into a document tree.
///
/// Recoverable inputs are normalized, not rejected; the only input that
/// cannot be tokenized at all is text containing an embedded NUL byte.
pub fn parse(markdown: &str) -> Result<Document> {
    if markdown.contains('\0') {
        return Err(Error::Parse {
            message: "input contains a NUL byte".to_string(),
        });
    }

    let arena = Arena::new();
    // Extensions stay disabled: the document model is the constrained
    // note-taking subset, not full GFM.
    let root = parse_document(&arena, markdown, &Options::default());

    Ok(Document {
        blocks: convert_blocks(root.children()),
    })
}

/// Parse markdown into its top-level blocks only.
///
/// Used by features that edit one block's markdown in isolation.
pub fn parse_top_level_blocks(markdown: &str) -> Result<Vec<Block>> {
    parse(markdown).map(|doc| doc.blocks)
}

/// Parse markdown, degrading to an empty document on failure.
///
/// For load paths where an unreadable note should open blank instead of
/// blocking the host.
pub fn parse_or_empty(markdown: &str) -> Document {
    parse(markdown).unwrap_or_warn_default(Document::default(), "parse markdown")
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal Conversion from comrak
// ─────────────────────────────────────────────────────────────────────────────

fn convert_blocks<'a>(nodes: impl Iterator<Item = &'a AstNode<'a>>) -> Vec<Block> {
    nodes.filter_map(convert_block).collect()
}

fn convert_block<'a>(node: &'a AstNode<'a>) -> Option<Block> {
    let value = node.data.borrow().value.clone();
    match value {
        NodeValue::Paragraph => Some(Block::Paragraph(convert_inlines(node.children()))),
        NodeValue::Heading(heading) => Some(Block::Heading {
            level: heading.level.clamp(1, 6),
            content: convert_inlines(node.children()),
        }),
        NodeValue::BlockQuote => Some(Block::Blockquote(convert_blocks(node.children()))),
        NodeValue::List(list) => {
            let items: Vec<ListItem> = node
                .children()
                .map(|item| convert_blocks(item.children()))
                .collect();
            match list.list_type {
                ComrakListType::Bullet => Some(Block::BulletList(items)),
                ComrakListType::Ordered => Some(Block::OrderedList {
                    start: list.start as u64,
                    items,
                }),
            }
        }
        NodeValue::CodeBlock(code) => {
            let language = code
                .info
                .trim()
                .split_whitespace()
                .next()
                .unwrap_or("")
                .to_string();
            let literal = code
                .literal
                .strip_suffix('\n')
                .unwrap_or(&code.literal)
                .to_string();
            Some(Block::CodeBlock {
                language: if language.is_empty() {
                    "plaintext".to_string()
                } else {
                    language
                },
                literal,
            })
        }
        NodeValue::ThematicBreak => Some(Block::HorizontalRule),
        // Raw HTML degrades to literal text.
        NodeValue::HtmlBlock(html) => {
            let literal = html.literal.trim_end().to_string();
            if literal.is_empty() {
                None
            } else {
                Some(Block::Paragraph(vec![Inline::Text(literal)]))
            }
        }
        _ => None,
    }
}

fn convert_inlines<'a>(nodes: impl Iterator<Item = &'a AstNode<'a>>) -> Vec<Inline> {
    let mut inlines: Vec<Inline> = Vec::new();
    for node in nodes {
        if let Some(inline) = convert_inline(node) {
            // Adjacent text runs merge so parse output is canonical.
            if let (Some(Inline::Text(previous)), Inline::Text(text)) =
                (inlines.last_mut(), &inline)
            {
                previous.push_str(text);
                continue;
            }
            inlines.push(inline);
        }
    }
    inlines
}

fn convert_inline<'a>(node: &'a AstNode<'a>) -> Option<Inline> {
    let value = node.data.borrow().value.clone();
    match value {
        NodeValue::Text(text) => Some(Inline::Text(text)),
        NodeValue::Code(code) => Some(Inline::Code(code.literal)),
        NodeValue::Emph => Some(Inline::Emphasis(convert_inlines(node.children()))),
        NodeValue::Strong => Some(Inline::Strong(convert_inlines(node.children()))),
        // Images degrade to links; the subset has no image node.
        NodeValue::Link(link) | NodeValue::Image(link) => Some(Inline::Link {
            href: link.url,
            title: if link.title.is_empty() {
                None
            } else {
                Some(link.title)
            },
            content: convert_inlines(node.children()),
        }),
        NodeValue::SoftBreak => Some(Inline::Text(" ".to_string())),
        NodeValue::LineBreak => Some(Inline::HardBreak),
        NodeValue::HtmlInline(html) => Some(Inline::Text(html)),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serialization
// ─────────────────────────────────────────────────────────────────────────────

/// Serialize a document tree back to markdown text. Total function.
pub fn serialize(doc: &Document) -> String {
    serialize_top_level_blocks(&doc.blocks)
}

/// Serialize a slice of top-level blocks.
pub fn serialize_top_level_blocks(blocks: &[Block]) -> String {
    serialize_blocks(blocks).trim_end().to_string()
}

fn serialize_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(serialize_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn serialize_block(block: &Block) -> String {
    match block {
        Block::Paragraph(content) => serialize_inlines(content),
        Block::Heading { level, content } => {
            format!(
                "{} {}",
                "#".repeat(*level as usize),
                serialize_inlines(content)
            )
        }
        Block::Blockquote(inner) => serialize_blocks(inner)
            .lines()
            .map(|line| {
                if line.is_empty() {
                    ">".to_string()
                } else {
                    format!("> {}", line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Block::BulletList(items) => serialize_list_items(items, "  ", |_| "- ".to_string()),
        Block::OrderedList { start, items } => {
            if items.is_empty() {
                return String::new();
            }
            let max_index = start + items.len() as u64 - 1;
            let width = max_index.to_string().len();
            let spacer = " ".repeat(width + 2);
            serialize_list_items(items, &spacer, |index| {
                format!("{:>width$}. ", start + index as u64, width = width)
            })
        }
        Block::CodeBlock { language, literal } => {
            let fence = "`".repeat(fence_length(literal));
            let tag = if language == "plaintext" { "" } else { language };
            format!("{fence}{tag}\n{literal}\n{fence}")
        }
        Block::HorizontalRule => "---".to_string(),
    }
}

fn serialize_list_items(
    items: &[ListItem],
    spacer: &str,
    first_delim: impl Fn(usize) -> String,
) -> String {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let body = serialize_blocks(item);
            let delim = first_delim(index);
            let mut lines = body.lines();
            let mut rendered = match lines.next() {
                Some(first) => format!("{delim}{first}"),
                None => delim.trim_end().to_string(),
            };
            for line in lines {
                rendered.push('\n');
                if !line.is_empty() {
                    rendered.push_str(spacer);
                    rendered.push_str(line);
                }
            }
            rendered
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fence length for a code block: one backtick more than the longest run of
/// backticks anywhere in the literal, never fewer than three.
fn fence_length(literal: &str) -> usize {
    longest_backtick_run(literal).max(2) + 1
}

/// Maximal-run scan, not token splitting: counts the longest contiguous
/// backtick run in `text`.
fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for byte in text.bytes() {
        if byte == b'`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn serialize_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for (index, inline) in inlines.iter().enumerate() {
        match inline {
            Inline::Text(text) => out.push_str(text),
            Inline::Code(code) => push_inline_code(&mut out, code),
            Inline::Emphasis(inner) => push_marked(&mut out, inner, "*"),
            Inline::Strong(inner) => push_marked(&mut out, inner, "**"),
            Inline::Link {
                href,
                title,
                content,
            } => push_link(&mut out, href, title.as_deref(), content),
            Inline::HardBreak => {
                // No dangling break at the end of a block.
                let has_following = inlines[index + 1..]
                    .iter()
                    .any(|node| !matches!(node, Inline::HardBreak));
                if has_following {
                    out.push_str("\\\n");
                }
            }
        }
    }
    out
}

fn push_inline_code(out: &mut String, code: &str) {
    let marker = "`".repeat(longest_backtick_run(code) + 1);
    if marker.len() > 1 {
        out.push_str(&marker);
        out.push(' ');
        out.push_str(code);
        out.push(' ');
        out.push_str(&marker);
    } else {
        out.push_str(&marker);
        out.push_str(code);
        out.push_str(&marker);
    }
}

/// Wrap `inner` in emphasis markers, expelling enclosing whitespace so the
/// markers sit tight against the content.
fn push_marked(out: &mut String, inner: &[Inline], marker: &str) {
    let body = serialize_inlines(inner);
    let trimmed = body.trim();
    if trimmed.is_empty() {
        out.push_str(&body);
        return;
    }

    let lead = &body[..body.len() - body.trim_start().len()];
    let trail = &body[body.trim_end().len()..];
    out.push_str(lead);
    out.push_str(marker);
    out.push_str(trimmed);
    out.push_str(marker);
    out.push_str(trail);
}

fn push_link(out: &mut String, href: &str, title: Option<&str>, content: &[Inline]) {
    if is_plain_link(href, title, content) {
        out.push('<');
        out.push_str(href);
        out.push('>');
        return;
    }

    let escaped_href: String = href
        .chars()
        .flat_map(|c| match c {
            '(' | ')' | '"' => vec!['\\', c],
            _ => vec![c],
        })
        .collect();

    out.push('[');
    out.push_str(&serialize_inlines(content));
    out.push_str("](");
    out.push_str(&escaped_href);
    if let Some(title) = title {
        out.push_str(" \"");
        out.push_str(&title.replace('"', "\\\""));
        out.push('"');
    }
    out.push(')');
}

/// A link renders as an autolink when it has no title, the href carries a
/// scheme, and the link text is exactly the href.
fn is_plain_link(href: &str, title: Option<&str>, content: &[Inline]) -> bool {
    if title.is_some() || !has_scheme(href) {
        return false;
    }
    matches!(content, [Inline::Text(text)] if text == href)
}

fn has_scheme(href: &str) -> bool {
    let word_len = href
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .count();
    word_len > 0 && href[word_len..].starts_with(':')
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
