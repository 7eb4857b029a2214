//! Centralized error handling for the editing core
//!
//! There are deliberately few error kinds: serialization is total and the
//! decoration engines degrade gracefully instead of failing, so only the
//! parse boundary (mode transitions and the block-scoped syntax lens) can
//! surface an error to the host.

use log::warn;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the editing core.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the editing core.
#[derive(Debug)]
pub enum Error {
    /// Source text could not be tokenized into a valid document tree.
    Parse { message: String },

    /// A block-scoped edit resolved to zero or multiple top-level blocks
    /// where exactly one was required.
    LensResolve { found: usize },

    /// A block-scoped edit targeted a block index the document no longer
    /// has.
    LensOutOfRange { index: usize, blocks: usize },
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse { message } => write!(f, "Failed to parse markdown: {}", message),
            Error::LensResolve { found } => {
                write!(
                    f,
                    "Block edit must produce exactly one block, got {}",
                    found
                )
            }
            Error::LensOutOfRange { index, blocks } => {
                write!(
                    f,
                    "Block index {} is out of range for a document with {} blocks",
                    index, blocks
                )
            }
        }
    }
}

impl std::error::Error for Error {}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse_error() {
        let err = Error::Parse {
            message: "embedded NUL byte".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Failed to parse markdown"));
        assert!(msg.contains("embedded NUL byte"));
    }

    #[test]
    fn test_display_lens_resolve_error() {
        let err = Error::LensResolve { found: 2 };
        let msg = format!("{}", err);
        assert!(msg.contains("exactly one block"));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_display_lens_out_of_range_error() {
        let err = Error::LensOutOfRange { index: 4, blocks: 2 };
        let msg = format!("{}", err);
        assert!(msg.contains("out of range"));
        assert!(msg.contains('4'));
    }

    #[test]
    fn test_error_source_is_none() {
        use std::error::Error as StdError;
        let err = Error::LensResolve { found: 0 };
        assert!(err.source().is_none());
    }

    #[test]
    fn test_unwrap_or_warn_default_ok() {
        let result: Result<i32> = Ok(42);
        assert_eq!(result.unwrap_or_warn_default(0, "test context"), 42);
    }

    #[test]
    fn test_unwrap_or_warn_default_err() {
        let result: Result<i32> = Err(Error::Parse {
            message: "broken".to_string(),
        });
        assert_eq!(result.unwrap_or_warn_default(7, "test context"), 7);
    }
}
