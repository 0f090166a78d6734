//! Error code definitions for parser diagnostics
//!
//! Error codes follow a naming convention: E{category}{number}
//! - E01xx: Lexical errors (literals, comments)
//! - E02xx: Structural errors (blocks, delimiters)
//! - E03xx: Declaration errors (names, type parameters)
//! - E05xx: Directive errors (regions, conditional blocks)
//! - E09xx: Generic/fallback errors

use std::fmt;

/// Error codes for parser diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // E01xx: Lexical errors
    // =========================================================================
    /// Invalid or unexpected character in source
    E0101,
    /// Unterminated string literal
    E0102,
    /// Unterminated block comment
    E0103,
    /// Unterminated character literal
    E0104,

    // =========================================================================
    // E02xx: Structural errors (blocks, delimiters)
    // =========================================================================
    /// Expected a specific delimiter
    E0201,
    /// Block not closed before end of input
    E0202,
    /// Unclosed parenthesis `(`
    E0203,
    /// Unclosed bracket `[` or attribute block `<`
    E0204,
    /// Unexpected closing delimiter
    E0205,
    /// Block closed by the wrong terminator
    E0206,

    // =========================================================================
    // E03xx: Declaration errors
    // =========================================================================
    /// Missing identifier/name
    E0301,
    /// Reserved word used as an identifier
    E0302,
    /// Unrecognized construct
    E0303,
    /// Malformed type parameter list
    E0304,
    /// Constraint clause names an undeclared type parameter
    E0305,
    /// Missing type annotation
    E0306,

    // =========================================================================
    // E05xx: Directive errors
    // =========================================================================
    /// End region directive without an open region
    E0501,
    /// End/else conditional directive without an open conditional block
    E0502,
    /// Region not closed before the end of its scope
    E0503,
    /// Conditional block not closed before the end of its scope
    E0504,
    /// Malformed preprocessor directive
    E0505,
    /// Comment region end marker names a different region
    E0506,

    // =========================================================================
    // E09xx: Generic/fallback errors
    // =========================================================================
    /// Unexpected token in current context
    E0901,
    /// Internal parser error
    E0999,
}

impl ErrorCode {
    /// Get the string representation of the error code (e.g., "E0201")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E0101 => "E0101",
            Self::E0102 => "E0102",
            Self::E0103 => "E0103",
            Self::E0104 => "E0104",
            Self::E0201 => "E0201",
            Self::E0202 => "E0202",
            Self::E0203 => "E0203",
            Self::E0204 => "E0204",
            Self::E0205 => "E0205",
            Self::E0206 => "E0206",
            Self::E0301 => "E0301",
            Self::E0302 => "E0302",
            Self::E0303 => "E0303",
            Self::E0304 => "E0304",
            Self::E0305 => "E0305",
            Self::E0306 => "E0306",
            Self::E0501 => "E0501",
            Self::E0502 => "E0502",
            Self::E0503 => "E0503",
            Self::E0504 => "E0504",
            Self::E0505 => "E0505",
            Self::E0506 => "E0506",
            Self::E0901 => "E0901",
            Self::E0999 => "E0999",
        }
    }

    /// Get a short description of the error category
    pub fn category_description(&self) -> &'static str {
        match self {
            Self::E0101 | Self::E0102 | Self::E0103 | Self::E0104 => "lexical error",
            Self::E0201 | Self::E0202 | Self::E0203 | Self::E0204 | Self::E0205 | Self::E0206 => {
                "structural error"
            }
            Self::E0301 | Self::E0302 | Self::E0303 | Self::E0304 | Self::E0305 | Self::E0306 => {
                "declaration error"
            }
            Self::E0501 | Self::E0502 | Self::E0503 | Self::E0504 | Self::E0505 | Self::E0506 => {
                "directive error"
            }
            Self::E0901 | Self::E0999 => "syntax error",
        }
    }

    /// Get the default message template for this error code
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::E0101 => "invalid character",
            Self::E0102 => "unterminated string literal",
            Self::E0103 => "unterminated block comment",
            Self::E0104 => "unterminated character literal",
            Self::E0201 => "expected delimiter",
            Self::E0202 => "unclosed block",
            Self::E0203 => "unclosed parenthesis",
            Self::E0204 => "unclosed bracket",
            Self::E0205 => "unexpected closing delimiter",
            Self::E0206 => "mismatched block terminator",
            Self::E0301 => "missing identifier",
            Self::E0302 => "reserved word used as identifier",
            Self::E0303 => "unrecognized construct",
            Self::E0304 => "invalid type parameter list",
            Self::E0305 => "unknown type parameter",
            Self::E0306 => "missing type annotation",
            Self::E0501 => "unmatched end region directive",
            Self::E0502 => "unmatched end conditional directive",
            Self::E0503 => "unclosed region",
            Self::E0504 => "unclosed conditional block",
            Self::E0505 => "invalid directive",
            Self::E0506 => "mismatched region name",
            Self::E0901 => "unexpected token",
            Self::E0999 => "internal parser error",
        }
    }

    /// Check if this is a structural error (block/delimiter-related)
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::E0201 | Self::E0202 | Self::E0203 | Self::E0204 | Self::E0205 | Self::E0206
        )
    }

    /// Check if this is a directive nesting error
    pub fn is_directive(&self) -> bool {
        matches!(
            self,
            Self::E0501 | Self::E0502 | Self::E0503 | Self::E0504 | Self::E0505 | Self::E0506
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
