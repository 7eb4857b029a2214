//! Markdown editing shortcuts.
//!
//! Each command inspects the document around the selection and produces an
//! [`EditTransaction`] describing the text changes and the selection that
//! should hold afterwards. Commands never mutate text themselves; the host
//! editor applies the transaction (or [`apply_transaction`] does, in tests
//! and headless contexts).
//!
//! All commands are toggles: invoking one on already-formatted text removes
//! the formatting again.

use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::markdown::language::normalize_code_language;
use crate::markdown::syntax::SyntaxTree;
use crate::string_utils::{floor_char_boundary, line_range_at, safe_slice};

// ─────────────────────────────────────────────────────────────────────────────
// Transaction Types
// ─────────────────────────────────────────────────────────────────────────────

/// An editor selection. `anchor` is where the selection started, `head`
/// where the cursor is; they coincide for a plain cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn cursor(position: usize) -> Self {
        Self {
            anchor: position,
            head: position,
        }
    }

    pub fn range(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }
}

/// One contiguous text replacement. `from == to` inserts, empty `insert`
/// deletes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl TextChange {
    pub fn replace(from: usize, to: usize, insert: impl Into<String>) -> Self {
        Self {
            from,
            to,
            insert: insert.into(),
        }
    }

    pub fn insert_at(position: usize, insert: impl Into<String>) -> Self {
        Self::replace(position, position, insert)
    }

    pub fn delete(from: usize, to: usize) -> Self {
        Self::replace(from, to, "")
    }
}

/// Who caused an edit. Sync transactions come from mode switching and must
/// not re-trigger document persistence the way user edits do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOrigin {
    User,
    Sync,
}

/// A batch of non-overlapping changes plus the selection to restore.
/// Change offsets address the document before any of them is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct EditTransaction {
    pub changes: Vec<TextChange>,
    pub selection: Selection,
    pub origin: EditOrigin,
}

/// Apply a transaction's changes to `text`, back to front so earlier
/// offsets stay valid.
pub fn apply_transaction(text: &str, transaction: &EditTransaction) -> String {
    let mut changes: Vec<&TextChange> = transaction.changes.iter().collect();
    changes.sort_by(|a, b| b.from.cmp(&a.from));

    let mut out = text.to_string();
    for change in changes {
        out.replace_range(change.from..change.to, &change.insert);
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// The shortcut commands the editor binds to keys and toolbar buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutCommand {
    ToggleBold,
    ToggleItalic,
    ToggleInlineCode,
    ToggleHeading,
    ToggleBlockquote,
    ToggleBulletList,
    ToggleOrderedList,
    ToggleCodeFence,
}

/// Build the transaction for a shortcut command. Total: every command has a
/// defined effect at every selection.
pub fn apply_shortcut(
    text: &str,
    selection: Selection,
    command: ShortcutCommand,
) -> EditTransaction {
    let selection = clamp_selection(text, selection);
    match command {
        ShortcutCommand::ToggleBold => toggle_wrap(text, selection, "**", "**"),
        ShortcutCommand::ToggleItalic => toggle_wrap(text, selection, "*", "*"),
        ShortcutCommand::ToggleInlineCode => toggle_wrap(text, selection, "`", "`"),
        ShortcutCommand::ToggleHeading => toggle_line_prefix(text, selection, "## "),
        ShortcutCommand::ToggleBlockquote => toggle_line_prefix(text, selection, "> "),
        ShortcutCommand::ToggleBulletList => toggle_line_prefix(text, selection, "- "),
        ShortcutCommand::ToggleOrderedList => toggle_line_prefix(text, selection, "1. "),
        ShortcutCommand::ToggleCodeFence => toggle_code_fence(text, selection),
    }
}

fn toggle_wrap(text: &str, selection: Selection, open: &str, close: &str) -> EditTransaction {
    let mut from = selection.from();
    let mut to = selection.to();

    if selection.is_empty() {
        if let Some((word_from, word_to)) = word_range_at(text, from) {
            from = word_from;
            to = word_to;
        }
    }

    let bytes = text.as_bytes();
    let has_wrapper = from >= open.len()
        && to + close.len() <= text.len()
        && &bytes[from - open.len()..from] == open.as_bytes()
        && &bytes[to..to + close.len()] == close.as_bytes();

    if has_wrapper {
        return EditTransaction {
            changes: vec![
                TextChange::delete(from - open.len(), from),
                TextChange::delete(to, to + close.len()),
            ],
            selection: Selection::range(from - open.len(), to - open.len()),
            origin: EditOrigin::User,
        };
    }

    if from == to {
        // Nothing to wrap: drop an empty pair and park the cursor inside.
        return EditTransaction {
            changes: vec![TextChange::insert_at(from, format!("{open}{close}"))],
            selection: Selection::cursor(from + open.len()),
            origin: EditOrigin::User,
        };
    }

    EditTransaction {
        changes: vec![
            TextChange::insert_at(from, open),
            TextChange::insert_at(to, close),
        ],
        selection: Selection::range(from + open.len(), to + open.len()),
        origin: EditOrigin::User,
    }
}

fn toggle_line_prefix(text: &str, selection: Selection, prefix: &str) -> EditTransaction {
    let head = selection.head;
    let (line_from, line_to) = line_range_at(text, head);
    let line = &text[line_from..line_to];

    if line.starts_with(prefix) {
        return EditTransaction {
            changes: vec![TextChange::delete(line_from, line_from + prefix.len())],
            selection: Selection::cursor(line_from.max(head.saturating_sub(prefix.len()))),
            origin: EditOrigin::User,
        };
    }

    // Heading toggles replace an existing heading of another level instead
    // of stacking prefixes. The cursor keeps its offset into the line's
    // content, so it stays on a character boundary even when the old and
    // new prefixes differ in length.
    if prefix == "## " {
        let old_prefix_len = heading_prefix_re()
            .find(line)
            .map(|m| m.end())
            .unwrap_or(0);
        let insert = format!("{prefix}{}", &line[old_prefix_len..]);
        let content_offset = head.saturating_sub(line_from + old_prefix_len);
        let anchor = line_from + prefix.len() + content_offset;
        return EditTransaction {
            changes: vec![TextChange::replace(line_from, line_to, insert)],
            selection: Selection::cursor(anchor),
            origin: EditOrigin::User,
        };
    }

    EditTransaction {
        changes: vec![TextChange::insert_at(line_from, prefix)],
        selection: Selection::cursor(head + prefix.len()),
        origin: EditOrigin::User,
    }
}

fn toggle_code_fence(text: &str, selection: Selection) -> EditTransaction {
    let from = selection.from();
    let to = selection.to();
    let selected = safe_slice(text, from, to);

    if selected.starts_with("```") && selected.ends_with("```") {
        let stripped = fence_open_re().replace(selected, "");
        let stripped = fence_close_re().replace(&stripped, "").into_owned();
        let length = stripped.len();
        return EditTransaction {
            changes: vec![TextChange::replace(from, to, stripped)],
            selection: Selection::range(from, from + length),
            origin: EditOrigin::User,
        };
    }

    EditTransaction {
        changes: vec![TextChange::replace(from, to, format!("```\n{selected}\n```"))],
        selection: Selection::range(from + 4, from + 4 + selected.len()),
        origin: EditOrigin::User,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Enter Auto-Format
// ─────────────────────────────────────────────────────────────────────────────

/// Auto-complete a fence when Enter is pressed at the end of a line holding
/// only a fence opener.
///
/// Returns `None` whenever the default newline behavior should run: the
/// selection is not an empty cursor at line end, the line is inline code or
/// an over-long fence, or a closing fence already exists below.
pub fn apply_enter_behavior(text: &str, selection: Selection) -> Option<EditTransaction> {
    let selection = clamp_selection(text, selection);
    if !selection.is_empty() {
        return None;
    }

    let head = selection.head;
    let (line_from, line_to) = line_range_at(text, head);
    if head != line_to {
        return None;
    }

    let line = &text[line_from..line_to];
    if inline_code_line_re().is_match(line.trim()) {
        return None;
    }
    if line.starts_with("````") {
        return None;
    }

    let captures = fence_line_re().captures(line)?;
    let normalized = normalize_code_language(captures.get(1).map(|m| m.as_str()));
    let language = if normalized == "plaintext" {
        String::new()
    } else {
        normalized
    };
    let replacement = format!("```{language}");

    if has_closing_fence_below(text, line_to) {
        return None;
    }

    debug!("auto-closing fence at {}..{}", line_from, line_to);
    Some(EditTransaction {
        changes: vec![TextChange::replace(
            line_from,
            line_to,
            format!("{replacement}\n\n```"),
        )],
        selection: Selection::cursor(line_from + replacement.len() + 1),
        origin: EditOrigin::User,
    })
}

fn has_closing_fence_below(text: &str, line_to: usize) -> bool {
    if line_to >= text.len() {
        return false;
    }
    text[line_to + 1..].lines().any(|line| line.trim() == "```")
}

/// Host surfaces report offsets in their own units; anything that is not a
/// character boundary floors to the previous one.
fn clamp_selection(text: &str, selection: Selection) -> Selection {
    Selection {
        anchor: floor_char_boundary(text, selection.anchor),
        head: floor_char_boundary(text, selection.head),
    }
}

fn word_range_at(text: &str, position: usize) -> Option<(usize, usize)> {
    let (line_from, line_to) = line_range_at(text, position);
    let bytes = text.as_bytes();

    let mut start = position;
    while start > line_from && is_word_byte(bytes[start - 1]) {
        start -= 1;
    }
    let mut end = position;
    while end < line_to && is_word_byte(bytes[end]) {
        end += 1;
    }

    if start == end {
        None
    } else {
        Some((start, end))
    }
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting State
// ─────────────────────────────────────────────────────────────────────────────

/// Which formatting constructs enclose the cursor. Drives toolbar toggle
/// highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormattingState {
    pub bold: bool,
    pub italic: bool,
    pub inline_code: bool,
    pub heading_level: Option<u8>,
    pub blockquote: bool,
    pub bullet_list: bool,
    pub ordered_list: bool,
    pub code_fence: bool,
}

/// Read the formatting state at `cursor` from the syntax tree.
pub fn formatting_state(tree: &SyntaxTree, cursor: usize) -> FormattingState {
    let mut state = FormattingState::default();
    for name in tree.node_names_at(cursor) {
        match name {
            "StrongEmphasis" => state.bold = true,
            "Emphasis" => state.italic = true,
            "InlineCode" => state.inline_code = true,
            "Blockquote" => state.blockquote = true,
            "BulletList" => state.bullet_list = true,
            "OrderedList" => state.ordered_list = true,
            "FencedCode" => state.code_fence = true,
            other => {
                if let Some(level) = other.strip_prefix("ATXHeading") {
                    state.heading_level = level.parse().ok();
                }
            }
        }
    }
    state
}

// ─────────────────────────────────────────────────────────────────────────────
// Regex Singletons
// ─────────────────────────────────────────────────────────────────────────────

static HEADING_PREFIX_RE: OnceLock<Regex> = OnceLock::new();
static FENCE_LINE_RE: OnceLock<Regex> = OnceLock::new();
static FENCE_OPEN_RE: OnceLock<Regex> = OnceLock::new();
static FENCE_CLOSE_RE: OnceLock<Regex> = OnceLock::new();
static INLINE_CODE_LINE_RE: OnceLock<Regex> = OnceLock::new();

fn heading_prefix_re() -> &'static Regex {
    HEADING_PREFIX_RE.get_or_init(|| Regex::new(r"^#{1,6}\s+").expect("static pattern"))
}

fn fence_line_re() -> &'static Regex {
    FENCE_LINE_RE.get_or_init(|| {
        Regex::new(r"(?i)^```([a-z0-9_+.#-]+)?$").expect("static pattern")
    })
}

fn fence_open_re() -> &'static Regex {
    FENCE_OPEN_RE.get_or_init(|| {
        Regex::new(r"(?i)^```[a-z0-9_+.#-]*\n?").expect("static pattern")
    })
}

fn fence_close_re() -> &'static Regex {
    FENCE_CLOSE_RE.get_or_init(|| Regex::new(r"\n?```$").expect("static pattern"))
}

fn inline_code_line_re() -> &'static Regex {
    INLINE_CODE_LINE_RE.get_or_init(|| Regex::new(r"^`[^`\n]+`$").expect("static pattern"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, selection: Selection, command: ShortcutCommand) -> (String, Selection) {
        let tx = apply_shortcut(text, selection, command);
        (apply_transaction(text, &tx), tx.selection)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Wrap Toggles
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_bold_wraps_selection() {
        let (out, sel) = run("hello world", Selection::range(6, 11), ShortcutCommand::ToggleBold);
        assert_eq!(out, "hello **world**");
        assert_eq!(sel, Selection::range(8, 13));
    }

    #[test]
    fn test_bold_unwraps_wrapped_selection() {
        let (out, sel) = run(
            "hello **world**",
            Selection::range(8, 13),
            ShortcutCommand::ToggleBold,
        );
        assert_eq!(out, "hello world");
        assert_eq!(sel, Selection::range(6, 11));
    }

    #[test]
    fn test_bold_expands_cursor_to_word() {
        let (out, sel) = run("hello world", Selection::cursor(8), ShortcutCommand::ToggleBold);
        assert_eq!(out, "hello **world**");
        assert_eq!(sel, Selection::range(8, 13));
    }

    #[test]
    fn test_bold_without_word_inserts_empty_pair() {
        let (out, sel) = run("a ", Selection::cursor(2), ShortcutCommand::ToggleBold);
        assert_eq!(out, "a ****");
        assert_eq!(sel, Selection::cursor(4));
    }

    #[test]
    fn test_italic_uses_single_star() {
        let (out, _) = run("word", Selection::range(0, 4), ShortcutCommand::ToggleItalic);
        assert_eq!(out, "*word*");
    }

    #[test]
    fn test_inline_code_toggle_round_trips() {
        let (wrapped, sel) = run("call", Selection::range(0, 4), ShortcutCommand::ToggleInlineCode);
        assert_eq!(wrapped, "`call`");
        let (unwrapped, sel) = run(&wrapped, sel, ShortcutCommand::ToggleInlineCode);
        assert_eq!(unwrapped, "call");
        assert_eq!(sel, Selection::range(0, 4));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Line Prefix Toggles
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_heading_toggle_adds_prefix() {
        let (out, sel) = run("Title", Selection::cursor(5), ShortcutCommand::ToggleHeading);
        assert_eq!(out, "## Title");
        assert_eq!(sel, Selection::cursor(8));
    }

    #[test]
    fn test_heading_toggle_removes_prefix() {
        let (out, sel) = run("## Title", Selection::cursor(4), ShortcutCommand::ToggleHeading);
        assert_eq!(out, "Title");
        assert_eq!(sel, Selection::cursor(1));
    }

    #[test]
    fn test_heading_toggle_replaces_other_level() {
        let (out, sel) = run("# Title", Selection::cursor(7), ShortcutCommand::ToggleHeading);
        assert_eq!(out, "## Title");
        assert_eq!(sel, Selection::cursor(8));
    }

    #[test]
    fn test_heading_replace_maps_cursor_by_content_offset() {
        // Cursor after "Ti" in "### Title" stays after "Ti" in "## Title".
        let (out, sel) = run("### Title", Selection::cursor(6), ShortcutCommand::ToggleHeading);
        assert_eq!(out, "## Title");
        assert_eq!(sel, Selection::cursor(5));
    }

    #[test]
    fn test_heading_replace_keeps_cursor_on_char_boundary() {
        let (out, sel) = run("# åå", Selection::cursor(1), ShortcutCommand::ToggleHeading);
        assert_eq!(out, "## åå");
        assert!(out.is_char_boundary(sel.head));
        assert_eq!(sel, Selection::cursor(3));
    }

    #[test]
    fn test_heading_removal_clamps_cursor_to_line_start() {
        let (out, sel) = run("## T", Selection::cursor(1), ShortcutCommand::ToggleHeading);
        assert_eq!(out, "T");
        assert_eq!(sel, Selection::cursor(0));
    }

    #[test]
    fn test_prefix_applies_to_cursor_line_only() {
        let (out, sel) = run(
            "first\nsecond",
            Selection::cursor(8),
            ShortcutCommand::ToggleBulletList,
        );
        assert_eq!(out, "first\n- second");
        assert_eq!(sel, Selection::cursor(10));
    }

    #[test]
    fn test_blockquote_and_ordered_prefixes() {
        let (quoted, _) = run("line", Selection::cursor(0), ShortcutCommand::ToggleBlockquote);
        assert_eq!(quoted, "> line");
        let (numbered, _) = run("line", Selection::cursor(0), ShortcutCommand::ToggleOrderedList);
        assert_eq!(numbered, "1. line");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Code Fence Toggle
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_fence_wraps_selection() {
        let (out, sel) = run(
            "let x = 1;",
            Selection::range(0, 10),
            ShortcutCommand::ToggleCodeFence,
        );
        assert_eq!(out, "```\nlet x = 1;\n```");
        assert_eq!(sel, Selection::range(4, 14));
    }

    #[test]
    fn test_fence_unwraps_fenced_selection() {
        let text = "```rust\nx\n```";
        let (out, sel) = run(text, Selection::range(0, text.len()), ShortcutCommand::ToggleCodeFence);
        assert_eq!(out, "x");
        assert_eq!(sel, Selection::range(0, 1));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Enter Auto-Format
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_enter_completes_fence_and_normalizes_language() {
        let tx = apply_enter_behavior("```py", Selection::cursor(5)).unwrap();
        assert_eq!(apply_transaction("```py", &tx), "```python\n\n```");
        assert_eq!(tx.selection, Selection::cursor(10));
    }

    #[test]
    fn test_enter_drops_plaintext_language() {
        let tx = apply_enter_behavior("```text", Selection::cursor(7)).unwrap();
        assert_eq!(apply_transaction("```text", &tx), "```\n\n```");
        assert_eq!(tx.selection, Selection::cursor(4));
    }

    #[test]
    fn test_enter_noop_when_closing_fence_exists_below() {
        let text = "```python\n```javascript\nprint(1)\n```";
        assert!(apply_enter_behavior(text, Selection::cursor(9)).is_none());
    }

    #[test]
    fn test_enter_noop_on_inline_code_line() {
        assert!(apply_enter_behavior("`test`", Selection::cursor(6)).is_none());
    }

    #[test]
    fn test_enter_noop_on_overlong_fence() {
        assert!(apply_enter_behavior("````", Selection::cursor(4)).is_none());
    }

    #[test]
    fn test_enter_noop_off_line_end_or_with_selection() {
        assert!(apply_enter_behavior("```py", Selection::cursor(3)).is_none());
        assert!(apply_enter_behavior("```py", Selection::range(0, 5)).is_none());
    }

    #[test]
    fn test_enter_skips_blank_lines_when_scanning_below() {
        let text = "```rust\n\n\n```";
        assert!(apply_enter_behavior(text, Selection::cursor(7)).is_none());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transactions and State
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_apply_transaction_orders_changes() {
        let tx = EditTransaction {
            changes: vec![TextChange::insert_at(0, "<"), TextChange::insert_at(3, ">")],
            selection: Selection::cursor(0),
            origin: EditOrigin::User,
        };
        assert_eq!(apply_transaction("abc", &tx), "<abc>");
    }

    #[test]
    fn test_shortcuts_tolerate_mid_char_offsets() {
        let text = "på 世界";
        for position in 0..=text.len() + 2 {
            let selection = Selection::cursor(position);
            for command in [
                ShortcutCommand::ToggleBold,
                ShortcutCommand::ToggleHeading,
                ShortcutCommand::ToggleCodeFence,
            ] {
                let tx = apply_shortcut(text, selection, command);
                let _ = apply_transaction(text, &tx);
            }
            let _ = apply_enter_behavior(text, Selection::cursor(position));
        }
    }

    #[test]
    fn test_formatting_state_inside_bold_heading() {
        let text = "## **bold**";
        let tree = SyntaxTree::scan(text);
        let state = formatting_state(&tree, 6);
        assert!(state.bold);
        assert_eq!(state.heading_level, Some(2));
        assert!(!state.italic);
    }

    #[test]
    fn test_formatting_state_in_fence_body() {
        let text = "```rust\nfn x() {}\n```";
        let tree = SyntaxTree::scan(text);
        assert!(formatting_state(&tree, 10).code_fence);
        assert!(!formatting_state(&tree, 10).bold);
    }

    #[test]
    fn test_formatting_state_default_in_plain_text() {
        let tree = SyntaxTree::scan("plain");
        assert_eq!(formatting_state(&tree, 2), FormattingState::default());
    }
}
