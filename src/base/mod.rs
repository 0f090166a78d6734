//! Foundation types for the arranger.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`Position`], [`Span`] - 1-based line/column positions in source text
//! - [`Language`] - the supported source languages
//!
//! This module has NO dependencies on other arranger modules.

mod language;
mod position;

pub use language::Language;
pub use position::{Position, Span};
