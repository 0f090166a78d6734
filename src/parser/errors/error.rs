//! Syntax error type
//!
//! Provides rich error information including:
//! - Error codes for categorization
//! - The parse context the error occurred in
//! - The offending source text
//! - Hints/suggestions for fixes
//! - Related source locations

use thiserror::Error;

use super::codes::ErrorCode;
use super::context::ParseContext;
use crate::base::Position;

/// Related location information for an error
///
/// Used to point to related source locations, e.g.,
/// "region opened here" pointing to the `#region` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    /// Description of this related location
    pub message: String,
    /// Source position
    pub position: Position,
}

impl RelatedInfo {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// A malformed-source error raised by the element parsers.
///
/// Positions are 1-based. `text` holds the offending source text when there
/// is any; it is empty for errors raised at end of input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {position}")]
pub struct SyntaxError {
    /// Human-readable error message
    pub message: String,
    /// Where the error was detected
    pub position: Position,
    /// Offending source text
    pub text: String,
    /// Categorized error code
    pub code: ErrorCode,
    /// Structural context the parser was in
    pub context: ParseContext,
    /// Optional suggestion for fixing the error
    pub hint: Option<String>,
    /// Related source locations
    pub related: Vec<RelatedInfo>,
}

impl SyntaxError {
    /// Create a new syntax error with minimal information
    pub fn new(message: impl Into<String>, position: Position, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            position,
            text: String::new(),
            code,
            context: ParseContext::TopLevel,
            hint: None,
            related: vec![],
        }
    }

    /// Create a builder for more complex error construction
    pub fn builder(code: ErrorCode) -> SyntaxErrorBuilder {
        SyntaxErrorBuilder::new(code)
    }

    /// Error for a construct that reached end of input without its closer.
    pub fn expected_closer(closer: &str, position: Position, context: ParseContext) -> Self {
        let code = match closer {
            "#endregion" | "#End Region" => ErrorCode::E0503,
            "#endif" | "#End If" => ErrorCode::E0504,
            _ => ErrorCode::E0202,
        };
        Self::builder(code)
            .message(format!("expected '{closer}'"))
            .at(position)
            .context(context)
            .build()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_context(mut self, context: ParseContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_related(mut self, info: RelatedInfo) -> Self {
        self.related.push(info);
        self
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn has_hint(&self) -> bool {
        self.hint.is_some()
    }

    pub fn has_related(&self) -> bool {
        !self.related.is_empty()
    }

    /// Format the error for display, with code, context and hint
    pub fn format(&self) -> String {
        let mut result = format!(
            "{}: {} {} ({})",
            self.code,
            self.message,
            self.context.description(),
            self.position
        );
        if !self.text.is_empty() {
            result.push_str(&format!("\n  found: {}", self.text));
        }
        if let Some(hint) = &self.hint {
            result.push_str(&format!("\n  hint: {}", hint));
        }
        for related in &self.related {
            result.push_str(&format!("\n  note: {} ({})", related.message, related.position));
        }
        result
    }
}

/// Builder for creating complex syntax errors
pub struct SyntaxErrorBuilder {
    code: ErrorCode,
    message: Option<String>,
    position: Option<Position>,
    text: String,
    context: ParseContext,
    hint: Option<String>,
    related: Vec<RelatedInfo>,
}

impl SyntaxErrorBuilder {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: None,
            position: None,
            text: String::new(),
            context: ParseContext::TopLevel,
            hint: None,
            related: vec![],
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn context(mut self, context: ParseContext) -> Self {
        self.context = context;
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn related(mut self, message: impl Into<String>, position: Position) -> Self {
        self.related.push(RelatedInfo::new(message, position));
        self
    }

    /// Build the syntax error. Missing fields fall back to the code's
    /// default message and the start of the file.
    pub fn build(self) -> SyntaxError {
        SyntaxError {
            message: self
                .message
                .unwrap_or_else(|| self.code.default_message().to_string()),
            position: self.position.unwrap_or_default(),
            text: self.text,
            code: self.code,
            context: self.context,
            hint: self.hint,
            related: self.related,
        }
    }
}

/// Create a context-aware "unexpected X" error
pub fn format_context_error(
    found: &str,
    position: Position,
    context: ParseContext,
) -> SyntaxError {
    let message = format!(
        "unexpected '{}' {}, expected {}",
        found,
        context.description(),
        context.expected_description()
    );

    SyntaxError::builder(ErrorCode::E0901)
        .message(message)
        .at(position)
        .text(found)
        .context(context)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_new() {
        let err = SyntaxError::new("expected ';'", Position::new(3, 14), ErrorCode::E0201);

        assert_eq!(err.message, "expected ';'");
        assert_eq!(err.code, ErrorCode::E0201);
        assert_eq!(err.line(), 3);
        assert_eq!(err.column(), 14);
        assert!(err.hint.is_none());
        assert!(err.related.is_empty());
    }

    #[test]
    fn test_display_names_line_and_column() {
        let err = SyntaxError::expected_closer("End Sub", Position::new(7, 1), ParseContext::MemberBody);
        assert_eq!(err.to_string(), "expected 'End Sub' at line 7, column 1");
        assert_eq!(err.code, ErrorCode::E0202);
    }

    #[test]
    fn test_expected_closer_codes() {
        let region = SyntaxError::expected_closer("#endregion", Position::new(1, 1), ParseContext::Region);
        assert_eq!(region.code, ErrorCode::E0503);
        let cond = SyntaxError::expected_closer("#End If", Position::new(1, 1), ParseContext::ConditionalBlock);
        assert_eq!(cond.code, ErrorCode::E0504);
    }

    #[test]
    fn test_syntax_error_with_hint() {
        let err = SyntaxError::new("expected ';'", Position::new(1, 10), ErrorCode::E0201)
            .with_hint("add ';' at the end of the declaration");

        assert!(err.has_hint());
        assert_eq!(
            err.hint.as_deref(),
            Some("add ';' at the end of the declaration")
        );
    }

    #[test]
    fn test_syntax_error_builder() {
        let err = SyntaxError::builder(ErrorCode::E0305)
            .message("unknown type parameter 'U'")
            .at(Position::new(4, 20))
            .text("U")
            .context(ParseContext::TypeParameterList)
            .related("type parameters declared here", Position::new(4, 14))
            .build();

        assert_eq!(err.text, "U");
        assert_eq!(err.context, ParseContext::TypeParameterList);
        assert!(err.has_related());
        assert_eq!(err.related[0].position, Position::new(4, 14));
    }

    #[test]
    fn test_syntax_error_builder_defaults() {
        let err = SyntaxError::builder(ErrorCode::E0501).build();

        assert_eq!(err.message, "unmatched end region directive");
        assert_eq!(err.position, Position::start());
    }

    #[test]
    fn test_format_error() {
        let err = SyntaxError::new("expected ';'", Position::new(2, 5), ErrorCode::E0201)
            .with_context(ParseContext::TypeBody)
            .with_text("}")
            .with_hint("add semicolon");

        let formatted = err.format();
        assert!(formatted.contains("E0201"));
        assert!(formatted.contains("in type body"));
        assert!(formatted.contains("found: }"));
        assert!(formatted.contains("hint: add semicolon"));
    }

    #[test]
    fn test_format_context_error() {
        let err = format_context_error("}", Position::new(9, 1), ParseContext::NamespaceBody);

        assert!(err.message.contains("'}'"));
        assert!(err.message.contains("in namespace body"));
        assert!(err.message.contains("expected"));
        assert_eq!(err.code, ErrorCode::E0901);
    }
}
