//! Markdown editing surface module
//!
//! This module implements the core of the dual-mode markdown editor: a
//! bidirectional codec between markdown text and a structural document tree,
//! the decoration engines that drive the formatted writer view, the shortcut
//! and auto-format commands, and the synchronizer that mediates between
//! writer and source mode. Parsing is built on the comrak library, a
//! CommonMark compatible parser.
//!
//! # Features
//! - Parse markdown text to a normalized document tree
//! - Serialize document trees back to canonical markdown
//! - Cursor-aware hiding of delimiter markers in writer mode
//! - Heading, fenced-code, and language-badge presentation decorations
//! - Toggle shortcuts for bold, italic, code, headings, quotes, and lists
//! - Fence auto-completion with code language normalization
//! - Writer/source mode switching and block-scoped lens editing
//!
//! # Example
//! ```ignore
//! use fn_editor::markdown::{parse, serialize, ModeSynchronizer};
//! use fn_editor::markdown::{apply_shortcut, Selection, ShortcutCommand};
//!
//! // Codec
//! let doc = parse("# Hello\n\nThis is **bold** text.")?;
//! let markdown = serialize(&doc);
//!
//! // Shortcuts
//! let tx = apply_shortcut(&markdown, Selection::range(0, 5), ShortcutCommand::ToggleBold);
//!
//! // Mode switching
//! let mut sync = ModeSynchronizer::new();
//! let transition = sync.to_source(&doc);
//! ```

mod codec;
mod decorations;
pub mod language;
mod markers;
mod mode;
mod presentation;
pub mod shortcuts;
pub mod syntax;

// Only export what's actually used by the host editor
pub use codec::{
    parse, parse_or_empty, parse_top_level_blocks, serialize, serialize_top_level_blocks, Block,
    Document, Inline, ListItem,
};
pub use decorations::{Decoration, DecorationEffect, DecorationSet, FencedLineRole};
pub use language::{normalize_code_language, CODE_LANGUAGE_PRESETS};
pub use markers::build_marker_decorations;
pub use mode::{
    apply_lens, open_lens, EditorMode, ModePayload, ModeSynchronizer, ModeTransition, SyntaxLens,
};
pub use presentation::build_presentation_decorations;
pub use shortcuts::{
    apply_enter_behavior, apply_shortcut, apply_transaction, formatting_state, EditOrigin,
    EditTransaction, FormattingState, Selection, ShortcutCommand, TextChange,
};
pub use syntax::{SyntaxNode, SyntaxTree};
