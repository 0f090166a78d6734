//! Element parsers for C# and Visual Basic
//!
//! Each parser turns one source file into an ordered list of top-level
//! [`CodeElement`]s. Parsing is structural, not semantic: declaration heads
//! are read closely (names, access, modifiers, types, parameters, type
//! parameters, attributes, comments), while member bodies are captured as raw
//! text.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Scanner → characters with strings/comments kept inert, 1-based positions
//!     ↓
//! CSharpParser / VbParser → per-construct sub-parsers
//!     ↓
//! Scope → directive stack (regions, conditional blocks), comment attachment
//!     ↓
//! Vec<CodeElement>
//! ```
//!
//! ## Failure
//!
//! There is no error recovery. The first [`SyntaxError`] aborts the file and
//! no partial tree is returned: rewriting a misparsed file would corrupt it.

mod csharp;
pub mod errors;
pub mod keywords;
mod scanner;
mod scope;
mod text;
mod vb;

use std::fmt;
use std::sync::Arc;

pub use csharp::CSharpParser;
pub use errors::{ErrorCode, ParseContext, SyntaxError};
pub use keywords::{DefaultKeywords, KeywordTable};
pub use scanner::{Depth, LiteralRules, LogicalLine, Scanner, ScannedLine, scan_line};
pub use vb::VbParser;

use crate::base::Language;
use crate::elements::CodeElement;

/// Comment texts that open and close comment-marker regions, e.g.
/// `// $(Begin) Fields` ... `// $(End) Fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommentRegionMarkers {
    pub begin: String,
    pub end: String,
}

impl Default for CommentRegionMarkers {
    fn default() -> Self {
        Self {
            begin: "$(Begin)".to_string(),
            end: "$(End)".to_string(),
        }
    }
}

/// A comment recognized as a region marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RegionMarker {
    Begin(String),
    End(String),
}

impl CommentRegionMarkers {
    pub(crate) fn classify(&self, comment_text: &str) -> Option<RegionMarker> {
        let text = comment_text.trim();
        if let Some(name) = text.strip_prefix(self.begin.as_str()) {
            return Some(RegionMarker::Begin(name.trim().to_string()));
        }
        text.strip_prefix(self.end.as_str())
            .map(|name| RegionMarker::End(name.trim().to_string()))
    }

    /// The comment text expected to close the region `name`.
    pub(crate) fn end_marker(&self, name: &str) -> String {
        format!("{} {}", self.end, name)
    }
}

/// Settings shared by both parsers.
#[derive(Clone, Default)]
pub struct ParserOptions {
    /// Reserved-word table; the language default when `None`
    pub keywords: Option<Arc<dyn KeywordTable>>,
    /// Recognize comment-marker regions when set
    pub comment_regions: Option<CommentRegionMarkers>,
}

impl ParserOptions {
    pub fn with_keywords(mut self, keywords: impl KeywordTable + 'static) -> Self {
        self.keywords = Some(Arc::new(keywords));
        self
    }

    pub fn with_comment_regions(mut self, markers: CommentRegionMarkers) -> Self {
        self.comment_regions = Some(markers);
        self
    }

    pub(crate) fn keyword_table(&self, language: Language) -> Arc<dyn KeywordTable> {
        self.keywords
            .clone()
            .unwrap_or_else(|| Arc::new(DefaultKeywords::new(language)))
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("keywords", &self.keywords.as_ref().map(|_| "custom"))
            .field("comment_regions", &self.comment_regions)
            .finish()
    }
}

/// Parse C# source with default options.
pub fn parse_csharp(source: &str) -> Result<Vec<CodeElement>, SyntaxError> {
    CSharpParser::default().parse(source)
}

/// Parse Visual Basic source with default options.
pub fn parse_vb(source: &str) -> Result<Vec<CodeElement>, SyntaxError> {
    VbParser::default().parse(source)
}

/// Parse `source` written in `language` with default options.
pub fn parse_source(language: Language, source: &str) -> Result<Vec<CodeElement>, SyntaxError> {
    parse_source_with(language, source, &ParserOptions::default())
}

/// Parse `source` written in `language` with the given options.
pub fn parse_source_with(
    language: Language,
    source: &str,
    options: &ParserOptions,
) -> Result<Vec<CodeElement>, SyntaxError> {
    match language {
        Language::CSharp => CSharpParser::new(options.clone()).parse(source),
        Language::VisualBasic => VbParser::new(options.clone()).parse(source),
    }
}
