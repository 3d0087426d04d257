//! rill_core: Core utilities for the rill scanner.
//!
//! Provides source buffer ownership, text spans and line maps used by the
//! scanner, the diagnostics crate and the command-line driver.

pub mod source;
pub mod text;

// Re-export commonly used types
pub use source::{SourceError, SourceFile, SourceResult};
pub use text::{LineAndColumn, LineMap, TextSpan};
