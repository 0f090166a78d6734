//! Logos-based tokenizer for condition expressions.

use std::ops::Range;

use logos::Logos;

use crate::config::ConfigurationError;

/// A token with its byte range in the expression text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Range<usize>,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub(super) enum TokenKind {
    /// Opens an attribute reference; its `)` never groups
    #[token("$(")]
    AttributeOpen,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(".")]
    Dot,

    #[token("==")]
    Equal,

    #[token("!=")]
    NotEqual,

    #[token(":")]
    Contains,

    #[token("=~")]
    Matches,

    #[token("!")]
    Bang,

    #[token("and", ignore(ascii_case))]
    And,

    #[token("or", ignore(ascii_case))]
    Or,

    /// Single-quoted, `''` escapes a quote
    #[regex(r"'([^']|'')*'")]
    String,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
}

impl TokenKind {
    /// How the token reads in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::AttributeOpen => "'$('",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Dot => "'.'",
            Self::Equal => "'=='",
            Self::NotEqual => "'!='",
            Self::Contains => "':'",
            Self::Matches => "'=~'",
            Self::Bang => "'!'",
            Self::And => "'And'",
            Self::Or => "'Or'",
            Self::String => "string literal",
            Self::Ident => "identifier",
        }
    }
}

/// Tokenize a whole expression, failing on the first character no token
/// starts with.
pub(super) fn tokenize(source: &str) -> Result<Vec<Token<'_>>, ConfigurationError> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = lexer.slice();
        match result {
            Ok(kind) => tokens.push(Token { kind, text, span }),
            Err(()) => {
                let reason = if text.starts_with('\'') {
                    "unterminated string literal".to_string()
                } else {
                    format!("unexpected character '{text}' at offset {}", span.start)
                };
                return Err(ConfigurationError::format(source, reason));
            }
        }
    }
    Ok(tokens)
}

/// Text of a string token without its quotes, `''` collapsed.
pub(super) fn string_value(text: &str) -> String {
    let inner = text
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .unwrap_or(text);
    inner.replace("''", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_attribute_reference_tokens() {
        assert_eq!(
            kinds("$(File.Name) =~ 'x'"),
            vec![
                TokenKind::AttributeOpen,
                TokenKind::Ident,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::Matches,
                TokenKind::String,
            ]
        );
    }

    #[test]
    fn test_keyword_operators_are_case_insensitive() {
        assert_eq!(
            kinds("'a' AND 'b' or 'c'"),
            vec![
                TokenKind::String,
                TokenKind::And,
                TokenKind::String,
                TokenKind::Or,
                TokenKind::String,
            ]
        );
        // Longer identifiers are not split into keywords.
        assert_eq!(kinds("Order"), vec![TokenKind::Ident]);
    }

    #[test]
    fn test_operators_inside_strings_stay_literal() {
        let tokens = tokenize("'It''s And Or =='").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(string_value(tokens[0].text), "It's And Or ==");
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("$(Name) == 'abc").unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::format("$(Name) == 'abc", "unterminated string literal")
        );
    }
}
