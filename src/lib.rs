//! fn-editor - Markdown Editing Core
//!
//! The headless editing core behind the FerrumNote dual-mode markdown
//! editor. It owns the document model and every text-level behavior of the
//! editing surface, while the host application owns rendering, key
//! bindings, and persistence.
//!
//! The crate is organized around a handful of seams:
//! - [`markdown`]: the codec, decoration engines, shortcuts, and mode
//!   synchronizer
//! - [`config`]: the policies that parameterize marker hiding and
//!   presentation styling
//! - [`error`]: the centralized error type for the parse boundary
//! - [`string_utils`]: byte-offset and line geometry helpers

pub mod config;
pub mod error;
pub mod markdown;
pub mod string_utils;

pub use config::{MarkerPolicy, RenderPolicy};
pub use error::{Error, Result, ResultExt};
