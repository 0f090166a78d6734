//! Parser error handling module
//!
//! This module provides error handling for the element parsers:
//! - Categorized error codes for filtering and documentation
//! - Context-aware error messages (where in the file the parse failed)
//! - Hints for common mistakes
//! - Related positions (e.g., "region opened here" for unclosed regions)
//!
//! Parsing never recovers: the first error aborts the file.

mod codes;
mod context;
mod error;

pub use codes::ErrorCode;
pub use context::ParseContext;
pub use error::{RelatedInfo, SyntaxError, SyntaxErrorBuilder, format_context_error};
