//! Editor-facing syntax tree.
//!
//! Decoration engines walk a positional syntax tree rather than the codec's
//! structural tree: they need the byte ranges of delimiter tokens (`#`, `*`,
//! backtick runs, link punctuation), which the structural tree deliberately
//! erases. In the running editor the tree comes from the incremental parser;
//! [`SyntaxTree::scan`] is a single-pass scanner over the same node
//! vocabulary, used to drive the engines directly from text.
//!
//! Node names follow the conventional markdown grammar: `Document`,
//! `Paragraph`, `ATXHeading1`..`ATXHeading6`, `HeaderMark`, `Blockquote`,
//! `QuoteMark`, `BulletList`, `OrderedList`, `ListItem`, `ListMark`,
//! `FencedCode`, `CodeMark`, `CodeInfo`, `InlineCode`, `Emphasis`,
//! `StrongEmphasis`, `EmphasisMark`, `Link`, `LinkMark`, `URL`.

// ─────────────────────────────────────────────────────────────────────────────
// Tree Types
// ─────────────────────────────────────────────────────────────────────────────

/// One node of the syntax tree. Ranges are byte offsets into the scanned
/// text, `from` inclusive and `to` exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub name: String,
    pub from: usize,
    pub to: usize,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(name: &str, from: usize, to: usize) -> Self {
        Self {
            name: name.to_string(),
            from,
            to,
            children: Vec::new(),
        }
    }

    /// Inclusive containment, so a cursor sitting on either edge of a node
    /// still counts as inside it.
    pub fn contains(&self, position: usize) -> bool {
        self.from <= position && position <= self.to
    }

    /// Preorder walk over this node and all descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a SyntaxNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// A scanned document. The root is always a `Document` node spanning the
/// whole text.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    pub root: SyntaxNode,
}

impl SyntaxTree {
    /// Names of every node whose range contains `position`, outermost first.
    pub fn node_names_at(&self, position: usize) -> Vec<&str> {
        let mut names = Vec::new();
        collect_names_at(&self.root, position, &mut names);
        names
    }
}

fn collect_names_at<'a>(node: &'a SyntaxNode, position: usize, names: &mut Vec<&'a str>) {
    if !node.contains(position) {
        return;
    }
    names.push(&node.name);
    for child in &node.children {
        collect_names_at(child, position, names);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scanner
// ─────────────────────────────────────────────────────────────────────────────

impl SyntaxTree {
    /// Scan markdown text into a syntax tree.
    ///
    /// Block structure is recognized line by line; inline structure is
    /// resolved within each line. Unbalanced delimiters stay plain text.
    pub fn scan(text: &str) -> SyntaxTree {
        let lines = line_ranges(text);
        let mut root = SyntaxNode::new("Document", 0, text.len());
        let mut index = 0;

        while index < lines.len() {
            let (from, to) = lines[index];
            let line = &text[from..to];

            if line.trim().is_empty() {
                index += 1;
                continue;
            }

            if let Some(node) = scan_heading(text, from, to) {
                root.children.push(node);
                index += 1;
            } else if line.starts_with("```") {
                let (node, consumed) = scan_fence(text, &lines, index);
                root.children.push(node);
                index += consumed;
            } else if line.starts_with('>') {
                let (node, consumed) = scan_blockquote(text, &lines, index);
                root.children.push(node);
                index += consumed;
            } else if bullet_mark_offset(line).is_some() {
                let (node, consumed) = scan_list(text, &lines, index, true);
                root.children.push(node);
                index += consumed;
            } else if ordered_mark_range(line).is_some() {
                let (node, consumed) = scan_list(text, &lines, index, false);
                root.children.push(node);
                index += consumed;
            } else {
                let (node, consumed) = scan_paragraph(text, &lines, index);
                root.children.push(node);
                index += consumed;
            }
        }

        SyntaxTree { root }
    }
}

/// Line byte ranges, end exclusive of the newline.
fn line_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for (offset, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            ranges.push((start, offset));
            start = offset + 1;
        }
    }
    if start <= text.len() && !text.is_empty() {
        ranges.push((start, text.len()));
    }
    ranges
}

fn is_structural_line(line: &str) -> bool {
    line.trim().is_empty()
        || line.starts_with("```")
        || line.starts_with('>')
        || heading_mark_len(line).is_some()
        || bullet_mark_offset(line).is_some()
        || ordered_mark_range(line).is_some()
}

fn heading_mark_len(line: &str) -> Option<usize> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if (1..=6).contains(&hashes) && (line.len() == hashes || line.as_bytes()[hashes] == b' ') {
        Some(hashes)
    } else {
        None
    }
}

fn bullet_mark_offset(line: &str) -> Option<usize> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    let rest = &line[indent..];
    if rest == "-" || rest.starts_with("- ") {
        Some(indent)
    } else {
        None
    }
}

/// Relative range of an ordered list marker, digits plus the dot.
fn ordered_mark_range(line: &str) -> Option<(usize, usize)> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    let rest = &line[indent..];
    let digits = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || !rest[digits..].starts_with('.') {
        return None;
    }
    let after = &rest[digits + 1..];
    if after.is_empty() || after.starts_with(' ') {
        Some((indent, indent + digits + 1))
    } else {
        None
    }
}

fn scan_heading(text: &str, from: usize, to: usize) -> Option<SyntaxNode> {
    let line = &text[from..to];
    let hashes = heading_mark_len(line)?;
    let mut node = SyntaxNode::new(&format!("ATXHeading{}", hashes), from, to);
    node.children
        .push(SyntaxNode::new("HeaderMark", from, from + hashes));
    let content_from = (from + hashes + 1).min(to);
    node.children
        .extend(scan_inlines(text, content_from, to));
    Some(node)
}

fn scan_fence(text: &str, lines: &[(usize, usize)], start: usize) -> (SyntaxNode, usize) {
    let (open_from, open_to) = lines[start];
    let open_line = &text[open_from..open_to];
    let run = open_line.bytes().take_while(|b| *b == b'`').count();

    let mut children = vec![SyntaxNode::new("CodeMark", open_from, open_from + run)];
    if !open_line[run..].trim().is_empty() {
        children.push(SyntaxNode::new("CodeInfo", open_from + run, open_to));
    }

    let mut consumed = 1;
    let mut end = open_to;
    for &(from, to) in &lines[start + 1..] {
        consumed += 1;
        end = to;
        let trimmed = text[from..to].trim();
        if trimmed.len() >= run && trimmed.bytes().all(|b| b == b'`') {
            let mark_from = from + (text[from..to].len() - text[from..to].trim_start().len());
            children.push(SyntaxNode::new("CodeMark", mark_from, mark_from + trimmed.len()));
            break;
        }
    }

    let mut node = SyntaxNode::new("FencedCode", open_from, end);
    node.children = children;
    (node, consumed)
}

fn scan_blockquote(text: &str, lines: &[(usize, usize)], start: usize) -> (SyntaxNode, usize) {
    let mut node = SyntaxNode::new("Blockquote", lines[start].0, lines[start].1);
    let mut consumed = 0;
    for &(from, to) in &lines[start..] {
        if !text[from..to].starts_with('>') {
            break;
        }
        consumed += 1;
        node.to = to;
        node.children.push(SyntaxNode::new("QuoteMark", from, from + 1));
        let content_from = if text[from + 1..to].starts_with(' ') {
            from + 2
        } else {
            from + 1
        };
        if content_from < to {
            let mut paragraph = SyntaxNode::new("Paragraph", content_from, to);
            paragraph.children = scan_inlines(text, content_from, to);
            node.children.push(paragraph);
        }
    }
    (node, consumed)
}

fn scan_list(
    text: &str,
    lines: &[(usize, usize)],
    start: usize,
    bullet: bool,
) -> (SyntaxNode, usize) {
    let name = if bullet { "BulletList" } else { "OrderedList" };
    let mut node = SyntaxNode::new(name, lines[start].0, lines[start].1);
    let mut consumed = 0;

    for &(from, to) in &lines[start..] {
        let line = &text[from..to];
        let mark = if bullet {
            bullet_mark_offset(line).map(|offset| (offset, offset + 1))
        } else {
            ordered_mark_range(line)
        };
        let Some((mark_from, mark_to)) = mark else {
            break;
        };
        consumed += 1;
        node.to = to;

        let mut item = SyntaxNode::new("ListItem", from + mark_from, to);
        item.children
            .push(SyntaxNode::new("ListMark", from + mark_from, from + mark_to));
        let content_from = (from + mark_to + 1).min(to);
        if content_from < to {
            let mut paragraph = SyntaxNode::new("Paragraph", content_from, to);
            paragraph.children = scan_inlines(text, content_from, to);
            item.children.push(paragraph);
        }
        node.children.push(item);
    }
    (node, consumed)
}

fn scan_paragraph(text: &str, lines: &[(usize, usize)], start: usize) -> (SyntaxNode, usize) {
    let mut node = SyntaxNode::new("Paragraph", lines[start].0, lines[start].1);
    let mut consumed = 0;
    for &(from, to) in &lines[start..] {
        if consumed > 0 && is_structural_line(&text[from..to]) {
            break;
        }
        consumed += 1;
        node.to = to;
        node.children.extend(scan_inlines(text, from, to));
    }
    (node, consumed)
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Scanner
// ─────────────────────────────────────────────────────────────────────────────

fn scan_inlines(text: &str, from: usize, to: usize) -> Vec<SyntaxNode> {
    let bytes = text.as_bytes();
    let mut nodes = Vec::new();
    let mut i = from;

    while i < to {
        match bytes[i] {
            b'`' => {
                let run = backtick_run(bytes, i, to);
                if let Some(close) = find_backtick_run(bytes, i + run, to, run) {
                    let mut node = SyntaxNode::new("InlineCode", i, close + run);
                    node.children.push(SyntaxNode::new("CodeMark", i, i + run));
                    node.children
                        .push(SyntaxNode::new("CodeMark", close, close + run));
                    nodes.push(node);
                    i = close + run;
                } else {
                    i += run;
                }
            }
            b'*' if i + 1 < to && bytes[i + 1] == b'*' => {
                if let Some(close) = find_bytes(bytes, b"**", i + 2, to) {
                    if close > i + 2 {
                        let mut node = SyntaxNode::new("StrongEmphasis", i, close + 2);
                        node.children.push(SyntaxNode::new("EmphasisMark", i, i + 2));
                        node.children.extend(scan_inlines(text, i + 2, close));
                        node.children
                            .push(SyntaxNode::new("EmphasisMark", close, close + 2));
                        nodes.push(node);
                        i = close + 2;
                        continue;
                    }
                }
                i += 2;
            }
            b'*' => {
                if let Some(close) = find_bytes(bytes, b"*", i + 1, to) {
                    if close > i + 1 {
                        let mut node = SyntaxNode::new("Emphasis", i, close + 1);
                        node.children.push(SyntaxNode::new("EmphasisMark", i, i + 1));
                        node.children.extend(scan_inlines(text, i + 1, close));
                        node.children
                            .push(SyntaxNode::new("EmphasisMark", close, close + 1));
                        nodes.push(node);
                        i = close + 1;
                        continue;
                    }
                }
                i += 1;
            }
            b'[' => {
                if let Some(node) = scan_link(text, i, to) {
                    i = node.to;
                    nodes.push(node);
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    nodes
}

fn scan_link(text: &str, from: usize, to: usize) -> Option<SyntaxNode> {
    let bytes = text.as_bytes();
    let close_bracket = find_bytes(bytes, b"]", from + 1, to)?;
    if close_bracket + 1 >= to || bytes[close_bracket + 1] != b'(' {
        return None;
    }
    let close_paren = find_bytes(bytes, b")", close_bracket + 2, to)?;

    let mut node = SyntaxNode::new("Link", from, close_paren + 1);
    node.children.push(SyntaxNode::new("LinkMark", from, from + 1));
    node.children
        .extend(scan_inlines(text, from + 1, close_bracket));
    node.children.push(SyntaxNode::new(
        "LinkMark",
        close_bracket,
        close_bracket + 2,
    ));
    node.children
        .push(SyntaxNode::new("URL", close_bracket + 2, close_paren));
    node.children
        .push(SyntaxNode::new("LinkMark", close_paren, close_paren + 1));
    Some(node)
}

fn backtick_run(bytes: &[u8], from: usize, to: usize) -> usize {
    bytes[from..to].iter().take_while(|b| **b == b'`').count()
}

/// Next backtick run of exactly `length`, skipping longer or shorter runs.
fn find_backtick_run(bytes: &[u8], from: usize, to: usize, length: usize) -> Option<usize> {
    let mut i = from;
    while i < to {
        if bytes[i] == b'`' {
            let run = backtick_run(bytes, i, to);
            if run == length {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

fn find_bytes(bytes: &[u8], needle: &[u8], from: usize, to: usize) -> Option<usize> {
    if needle.len() > to {
        return None;
    }
    (from..=to - needle.len()).find(|&i| &bytes[i..i + needle.len()] == needle)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
