//! Cursor-aware marker hiding.
//!
//! Writer mode renders formatted text but keeps the document as plain
//! markdown. Delimiter tokens are hidden unless the cursor sits inside the
//! construct they delimit, so a construct "opens up" for editing and folds
//! away again when the cursor leaves.

use log::trace;

use crate::config::MarkerPolicy;
use crate::markdown::decorations::{Decoration, DecorationEffect, DecorationSet};
use crate::markdown::syntax::{SyntaxNode, SyntaxTree};

/// Compute the hidden-marker decorations for one cursor position.
pub fn build_marker_decorations(
    tree: &SyntaxTree,
    text: &str,
    cursor: usize,
    policy: &MarkerPolicy,
) -> DecorationSet {
    let mut decorations = Vec::new();
    for child in &tree.root.children {
        visit(child, &tree.root, text, cursor, policy, &mut decorations);
    }
    trace!(
        "marker pass at cursor {}: {} decorations",
        cursor,
        decorations.len()
    );
    DecorationSet::from_unsorted(decorations)
}

fn visit(
    node: &SyntaxNode,
    parent: &SyntaxNode,
    text: &str,
    cursor: usize,
    policy: &MarkerPolicy,
    decorations: &mut Vec<Decoration>,
) {
    let cursor_in_parent = parent.contains(cursor);

    if node.name == "CodeInfo" && parent.name == "FencedCode" {
        if !cursor_in_parent {
            decorations.push(Decoration::new(
                node.from,
                node.to,
                DecorationEffect::CodeInfoBadge,
            ));
        }
    } else if policy.is_marker(&node.name) && !cursor_in_parent {
        let fence_mark = node.name == "CodeMark" && parent.name == "FencedCode";
        if !fence_mark || policy.hide_fence_code_marks {
            let (from, to) = hide_range(node, text);
            if from < to {
                decorations.push(Decoration::new(from, to, DecorationEffect::HiddenMarker));
            }
        }
    }

    for child in &node.children {
        visit(child, node, text, cursor, policy, decorations);
    }
}

/// Block-leading marks swallow their one separating space so hiding them
/// does not leave the content indented.
fn hide_range(node: &SyntaxNode, text: &str) -> (usize, usize) {
    let mut to = node.to;
    if matches!(node.name.as_str(), "HeaderMark" | "ListMark" | "QuoteMark")
        && text.as_bytes().get(to) == Some(&b' ')
    {
        to += 1;
    }
    (node.from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden_ranges(text: &str, cursor: usize) -> Vec<(usize, usize)> {
        let tree = SyntaxTree::scan(text);
        build_marker_decorations(&tree, text, cursor, &MarkerPolicy::default())
            .iter()
            .filter(|d| d.effect == DecorationEffect::HiddenMarker)
            .map(|d| (d.from, d.to))
            .collect()
    }

    #[test]
    fn test_heading_mark_hidden_when_cursor_elsewhere() {
        let text = "# Title\n\nParagraph";
        assert_eq!(hidden_ranges(text, text.len()), vec![(0, 2)]);
    }

    #[test]
    fn test_heading_mark_visible_when_cursor_inside() {
        assert!(hidden_ranges("# Title\n\nParagraph", 3).is_empty());
    }

    #[test]
    fn test_heading_mark_visible_at_inclusive_edges() {
        let text = "# Title\n\nParagraph";
        assert!(hidden_ranges(text, 0).is_empty());
        assert!(hidden_ranges(text, 7).is_empty());
    }

    #[test]
    fn test_bold_marks_hidden_outside_visible_inside() {
        let text = "plain **bold** plain";
        // Cursor in the surrounding text: both mark pairs hidden.
        assert_eq!(hidden_ranges(text, 0), vec![(6, 8), (12, 14)]);
        // Cursor inside the strong span: both stay visible.
        assert!(hidden_ranges(text, 10).is_empty());
    }

    #[test]
    fn test_list_mark_swallows_trailing_space() {
        let text = "- item\n- other\n\ntail";
        let ranges = hidden_ranges(text, text.len());
        assert!(ranges.contains(&(0, 2)));
        assert!(ranges.contains(&(7, 9)));
    }

    #[test]
    fn test_list_mark_visible_for_item_under_cursor() {
        let text = "- item\n- other";
        // Cursor inside the second item: its own mark stays visible.
        let ranges = hidden_ranges(text, 10);
        assert_eq!(ranges, vec![(0, 2)]);
    }

    #[test]
    fn test_quote_mark_hidden_with_space() {
        let text = "> quoted\n\nafter";
        assert_eq!(hidden_ranges(text, text.len()), vec![(0, 2)]);
    }

    #[test]
    fn test_fence_marks_kept_by_default_policy() {
        let text = "```rust\nfn x() {}\n```\n\ntail";
        let ranges = hidden_ranges(text, text.len());
        assert!(ranges.is_empty());
    }

    #[test]
    fn test_fence_marks_hidden_when_policy_allows() {
        let text = "```rust\nfn x() {}\n```\n\ntail";
        let policy = MarkerPolicy {
            hide_fence_code_marks: true,
            ..MarkerPolicy::default()
        };
        let tree = SyntaxTree::scan(text);
        let set = build_marker_decorations(&tree, text, text.len(), &policy);
        let marks: Vec<_> = set
            .iter()
            .filter(|d| d.effect == DecorationEffect::HiddenMarker)
            .map(|d| (d.from, d.to))
            .collect();
        assert_eq!(marks, vec![(0, 3), (18, 21)]);
    }

    #[test]
    fn test_code_info_badge_only_when_cursor_outside() {
        let text = "```rust\nfn x() {}\n```\n\ntail";
        let tree = SyntaxTree::scan(text);
        let policy = MarkerPolicy::default();

        let outside = build_marker_decorations(&tree, text, text.len(), &policy);
        assert!(outside
            .iter()
            .any(|d| d.effect == DecorationEffect::CodeInfoBadge && (d.from, d.to) == (3, 7)));

        let inside = build_marker_decorations(&tree, text, 10, &policy);
        assert!(!inside
            .iter()
            .any(|d| d.effect == DecorationEffect::CodeInfoBadge));
    }

    #[test]
    fn test_link_marks_hidden_outside() {
        let text = "see [docs](https://x.dev) end";
        let ranges = hidden_ranges(text, 0);
        assert_eq!(ranges, vec![(4, 5), (9, 11), (24, 25)]);
    }

    #[test]
    fn test_decorations_sorted_by_position() {
        let text = "# H\n\n**a** *b*";
        let ranges = hidden_ranges(text, 2);
        let mut sorted = ranges.clone();
        sorted.sort();
        assert_eq!(ranges, sorted);
    }
}
