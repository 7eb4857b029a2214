//! Decoration primitives shared by the marker and presentation engines.
//!
//! A decoration attaches one rendering effect to a byte range of the
//! document. Engines collect decorations in discovery order and hand back a
//! [`DecorationSet`], which normalizes ordering so renderers can apply them
//! in a single forward pass.

/// Position of a line within a fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FencedLineRole {
    Open,
    Body,
    Close,
}

/// What a decoration does to its range.
#[derive(Debug, Clone, PartialEq)]
pub enum DecorationEffect {
    /// Collapse the range out of the rendered view.
    HiddenMarker,
    /// Replace a fence info string with a floating language badge.
    CodeInfoBadge,
    /// Style the whole line as a heading of the given level.
    HeadingLine { level: u8, scale: f32 },
    /// Style the whole line as part of a fenced code block.
    FencedLine { role: FencedLineRole },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    pub effect: DecorationEffect,
}

impl Decoration {
    pub fn new(from: usize, to: usize, effect: DecorationEffect) -> Self {
        Self { from, to, effect }
    }

    /// A zero-width decoration anchored at a line start.
    pub fn line(at: usize, effect: DecorationEffect) -> Self {
        Self::new(at, at, effect)
    }
}

/// Decorations sorted by `(from, to)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

impl DecorationSet {
    pub fn from_unsorted(mut decorations: Vec<Decoration>) -> Self {
        decorations.sort_by_key(|d| (d.from, d.to));
        Self { decorations }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter()
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    pub fn as_slice(&self) -> &[Decoration] {
        &self.decorations
    }
}
