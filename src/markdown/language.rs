//! Code block language normalization.
//!
//! Fence info strings arrive in whatever shorthand the author typed; the
//! rest of the crate only ever sees canonical identifiers.

/// Shorthand identifiers mapped to their canonical form.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("py", "python"),
    ("python3", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("c++", "cpp"),
    ("cxx", "cpp"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("plain", "plaintext"),
    ("text", "plaintext"),
];

/// Canonical languages offered by pickers, most common first.
pub const CODE_LANGUAGE_PRESETS: &[&str] = &[
    "plaintext",
    "python",
    "c",
    "cpp",
    "rust",
    "typescript",
    "javascript",
    "bash",
    "json",
    "go",
    "java",
];

/// Normalize a raw fence language tag to its canonical identifier.
///
/// Trims and lowercases, maps aliases, and treats a missing or empty tag as
/// `plaintext`. Unknown identifiers pass through unchanged so uncommon
/// languages are not destroyed.
pub fn normalize_code_language(raw: Option<&str>) -> String {
    let lowered = raw.unwrap_or("").trim().to_lowercase();
    if lowered.is_empty() {
        return "plaintext".to_string();
    }
    for (alias, canonical) in LANGUAGE_ALIASES {
        if lowered == *alias {
            return (*canonical).to_string();
        }
    }
    lowered
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(normalize_code_language(Some("py")), "python");
        assert_eq!(normalize_code_language(Some("python3")), "python");
        assert_eq!(normalize_code_language(Some("ts")), "typescript");
        assert_eq!(normalize_code_language(Some("c++")), "cpp");
        assert_eq!(normalize_code_language(Some("shell")), "bash");
        assert_eq!(normalize_code_language(Some("text")), "plaintext");
    }

    #[test]
    fn test_normalize_trims_and_lowercases() {
        assert_eq!(normalize_code_language(Some("  RUST ")), "rust");
        assert_eq!(normalize_code_language(Some("JS")), "javascript");
    }

    #[test]
    fn test_normalize_empty_and_missing_are_plaintext() {
        assert_eq!(normalize_code_language(None), "plaintext");
        assert_eq!(normalize_code_language(Some("")), "plaintext");
        assert_eq!(normalize_code_language(Some("   ")), "plaintext");
    }

    #[test]
    fn test_normalize_unknown_passes_through() {
        assert_eq!(normalize_code_language(Some("zig")), "zig");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for preset in CODE_LANGUAGE_PRESETS {
            assert_eq!(normalize_code_language(Some(preset)), *preset);
        }
        for (_, canonical) in LANGUAGE_ALIASES {
            assert_eq!(normalize_code_language(Some(canonical)), *canonical);
        }
    }

    #[test]
    fn test_presets_lead_with_plaintext() {
        assert_eq!(CODE_LANGUAGE_PRESETS[0], "plaintext");
        assert!(CODE_LANGUAGE_PRESETS.contains(&"rust"));
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent_on_arbitrary_input(raw in ".*") {
            let once = normalize_code_language(Some(&raw));
            prop_assert_eq!(normalize_code_language(Some(&once)), once);
        }

        #[test]
        fn prop_normalize_never_returns_empty(raw in ".*") {
            prop_assert!(!normalize_code_language(Some(&raw)).is_empty());
        }
    }
}
