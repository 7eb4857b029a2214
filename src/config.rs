//! Policy configuration for the writer view
//!
//! Policies are plain, serde-derived data supplied once per editor instance:
//! the marker policy tells the marker engine which syntax-tree node names are
//! marker glyphs, and the render policy drives the purely visual decorations
//! (heading scale, fenced-code styling, code-info badge).

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Marker Policy
// ─────────────────────────────────────────────────────────────────────────────

/// Which syntax-tree nodes count as marker glyphs, and whether fenced-code
/// marks participate in hiding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPolicy {
    /// Node names treated as hideable markers.
    pub marker_node_names: Vec<String>,
    /// Fence markers carry the language tag, so they stay visible unless
    /// this flag is set.
    pub hide_fence_code_marks: bool,
}

impl Default for MarkerPolicy {
    fn default() -> Self {
        Self {
            marker_node_names: [
                "HeaderMark",
                "QuoteMark",
                "ListMark",
                "EmphasisMark",
                "CodeMark",
                "LinkMark",
            ]
            .iter()
            .map(|name| name.to_string())
            .collect(),
            hide_fence_code_marks: false,
        }
    }
}

impl MarkerPolicy {
    /// Whether `name` is registered as a marker node.
    pub fn is_marker(&self, name: &str) -> bool {
        self.marker_node_names.iter().any(|n| n == name)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Render Policy
// ─────────────────────────────────────────────────────────────────────────────

/// Selection-independent presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPolicy {
    /// Visual scale factor per heading level (index 0 = level 1).
    pub heading_scale: [f32; 6],
    /// Tag fenced-code lines with open/body/close roles.
    pub fenced_code_lines: bool,
    /// Emit a styling mark for the fence language tag.
    pub show_code_info_badge: bool,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self {
            heading_scale: [1.6, 1.4, 1.25, 1.15, 1.05, 1.0],
            fenced_code_lines: true,
            show_code_info_badge: true,
        }
    }
}

impl RenderPolicy {
    /// Scale factor for a heading level (1-6). Out-of-range levels clamp
    /// to level 6.
    pub fn scale_for_level(&self, level: u8) -> f32 {
        let index = level.clamp(1, 6) as usize - 1;
        self.heading_scale[index]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_marker_policy_names() {
        let policy = MarkerPolicy::default();
        assert!(policy.is_marker("HeaderMark"));
        assert!(policy.is_marker("EmphasisMark"));
        assert!(policy.is_marker("CodeMark"));
        assert!(!policy.is_marker("Paragraph"));
        assert!(!policy.hide_fence_code_marks);
    }

    #[test]
    fn test_default_render_policy() {
        let policy = RenderPolicy::default();
        assert!(policy.fenced_code_lines);
        assert!(policy.show_code_info_badge);
        assert!(policy.scale_for_level(1) > policy.scale_for_level(6));
    }

    #[test]
    fn test_scale_for_level_clamps() {
        let policy = RenderPolicy::default();
        assert_eq!(policy.scale_for_level(0), policy.scale_for_level(1));
        assert_eq!(policy.scale_for_level(9), policy.scale_for_level(6));
    }

    #[test]
    fn test_marker_policy_json_round_trip() {
        let policy = MarkerPolicy {
            marker_node_names: vec!["HeaderMark".to_string()],
            hide_fence_code_marks: true,
        };
        let json = serde_json::to_string(&policy).unwrap();
        let restored: MarkerPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, policy);
    }

    #[test]
    fn test_render_policy_json_round_trip() {
        let policy = RenderPolicy::default();
        let json = serde_json::to_string(&policy).unwrap();
        let restored: RenderPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, policy);
    }
}
