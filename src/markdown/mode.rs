//! Writer/source mode synchronization.
//!
//! The editor keeps one persistent representation (the document tree) and
//! two views of it: the formatted writer view and the raw markdown source
//! view. Switching views serializes or reparses through the codec. The
//! source text is authoritative when leaving source mode, so a reparse that
//! fails leaves the synchronizer in source mode with the text untouched
//! rather than discarding the user's markdown.
//!
//! The syntax lens is the small sibling of full source mode: it exposes a
//! single top-level block as markdown for in-place raw editing.

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::markdown::codec::{
    self, parse_top_level_blocks, serialize_top_level_blocks, Block, Document,
};
use crate::markdown::shortcuts::EditOrigin;

// ─────────────────────────────────────────────────────────────────────────────
// Mode Synchronizer
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Writer,
    Source,
}

/// Content handed to the view being switched to.
#[derive(Debug, Clone, PartialEq)]
pub enum ModePayload {
    /// Markdown text for the source editor.
    SourceText(String),
    /// Document tree for the writer view.
    WriterDocument(Document),
}

/// The outcome of a successful mode switch.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeTransition {
    pub mode: EditorMode,
    pub origin: EditOrigin,
    pub payload: ModePayload,
}

/// Tracks which view owns the document and mediates switches between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSynchronizer {
    mode: EditorMode,
}

impl Default for ModeSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeSynchronizer {
    pub fn new() -> Self {
        Self {
            mode: EditorMode::Writer,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    /// Switch to source mode, rendering the writer document to markdown.
    /// Infallible: serialization is total.
    pub fn to_source(&mut self, document: &Document) -> ModeTransition {
        let markdown = codec::serialize(document);
        debug!("writer -> source: {} bytes of markdown", markdown.len());
        self.mode = EditorMode::Source;
        ModeTransition {
            mode: EditorMode::Source,
            origin: EditOrigin::Sync,
            payload: ModePayload::SourceText(markdown),
        }
    }

    /// Switch to writer mode by reparsing the source text. On failure the
    /// synchronizer stays in source mode and the error is surfaced to the
    /// host.
    pub fn to_writer(&mut self, markdown: &str) -> Result<ModeTransition> {
        match codec::parse(markdown) {
            Ok(document) => {
                debug!("source -> writer: {} top-level blocks", document.blocks.len());
                self.mode = EditorMode::Writer;
                Ok(ModeTransition {
                    mode: EditorMode::Writer,
                    origin: EditOrigin::Sync,
                    payload: ModePayload::WriterDocument(document),
                })
            }
            Err(err) => {
                warn!("source -> writer rejected: {}", err);
                Err(err)
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Lens
// ─────────────────────────────────────────────────────────────────────────────

/// A single top-level block exposed as editable markdown.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxLens {
    pub block_index: usize,
    pub markdown: String,
}

/// Open a lens over the block at `index`, or `None` past the end of the
/// document.
pub fn open_lens(document: &Document, index: usize) -> Option<SyntaxLens> {
    document.blocks.get(index).map(|block| SyntaxLens {
        block_index: index,
        markdown: serialize_top_level_blocks(std::slice::from_ref(block)),
    })
}

/// Commit a lens edit: reparse `replacement` and substitute it for the
/// block at `index`. The edit must resolve to exactly one top-level block,
/// so a lens cannot silently split or swallow its neighbors.
pub fn apply_lens(document: &Document, index: usize, replacement: &str) -> Result<Document> {
    if index >= document.blocks.len() {
        return Err(Error::LensOutOfRange {
            index,
            blocks: document.blocks.len(),
        });
    }

    let blocks = parse_top_level_blocks(replacement)?;
    match <[Block; 1]>::try_from(blocks) {
        Ok([block]) => {
            let mut updated = document.clone();
            updated.blocks[index] = block;
            Ok(updated)
        }
        Err(blocks) => Err(Error::LensResolve {
            found: blocks.len(),
        }),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
