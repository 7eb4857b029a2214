//! Cursor-independent writer presentation.
//!
//! Structural styling that never changes with the selection: heading lines
//! get a scale, fenced code blocks get per-line open/body/close roles for
//! contiguous background panels, and fence info strings get a language
//! badge. Kept separate from the marker engine so it only recomputes when
//! the document changes.

use crate::config::RenderPolicy;
use crate::markdown::decorations::{
    Decoration, DecorationEffect, DecorationSet, FencedLineRole,
};
use crate::markdown::syntax::SyntaxTree;
use crate::string_utils::{line_range_at, line_starts_in};

/// Compute the presentation decorations for a document.
pub fn build_presentation_decorations(
    tree: &SyntaxTree,
    text: &str,
    policy: &RenderPolicy,
) -> DecorationSet {
    let mut decorations = Vec::new();

    tree.root.walk(&mut |node| {
        if let Some(level) = heading_level(&node.name) {
            let (line_from, _) = line_range_at(text, node.from);
            decorations.push(Decoration::line(
                line_from,
                DecorationEffect::HeadingLine {
                    level,
                    scale: policy.scale_for_level(level),
                },
            ));
        } else if node.name == "FencedCode" && policy.fenced_code_lines {
            let line_starts = line_starts_in(text, node.from, node.to);
            let last = line_starts.len().saturating_sub(1);
            for (index, line_from) in line_starts.iter().copied().enumerate() {
                let role = if index == 0 {
                    FencedLineRole::Open
                } else if index == last {
                    FencedLineRole::Close
                } else {
                    FencedLineRole::Body
                };
                decorations.push(Decoration::line(
                    line_from,
                    DecorationEffect::FencedLine { role },
                ));
            }
        } else if node.name == "CodeInfo" && policy.show_code_info_badge {
            decorations.push(Decoration::new(
                node.from,
                node.to,
                DecorationEffect::CodeInfoBadge,
            ));
        }
    });

    DecorationSet::from_unsorted(decorations)
}

fn heading_level(name: &str) -> Option<u8> {
    let level = name.strip_prefix("ATXHeading")?;
    level.parse::<u8>().ok().filter(|l| (1..=6).contains(l))
}
