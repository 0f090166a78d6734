//! Recursive-descent parser for condition expressions.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! or         := and ("Or" and)*
//! and        := unary ("And" unary)*
//! unary      := "!" unary | primary
//! primary    := "(" or ")" | comparison
//! comparison := operand ("==" | "!=" | ":" | "=~") operand
//! operand    := 'string' | "$(" [scope "."] attribute ")"
//! ```

use super::ast::{AttributeReference, ComparisonOperator, Expression, Operand};
use super::attributes::{ElementAttribute, FileAttribute};
use super::lexer::{Token, TokenKind, string_value, tokenize};
use crate::config::ConfigurationError;

/// Parse a condition expression.
pub fn parse_expression(source: &str) -> Result<Expression, ConfigurationError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ConfigurationError::format(source, "empty expression"));
    }
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
    };
    let expression = parser.parse_or()?;
    match parser.current_kind() {
        None => Ok(expression),
        Some(TokenKind::RParen) => Err(parser.error("unmatched ')'")),
        Some(kind) => Err(parser.error(format!("unexpected {}", kind.describe()))),
    }
}

fn comparison_operator(kind: TokenKind) -> Option<ComparisonOperator> {
    match kind {
        TokenKind::Equal => Some(ComparisonOperator::Equal),
        TokenKind::NotEqual => Some(ComparisonOperator::NotEqual),
        TokenKind::Contains => Some(ComparisonOperator::Contains),
        TokenKind::Matches => Some(ComparisonOperator::Matches),
        _ => None,
    }
}

struct Parser<'s> {
    source: &'s str,
    tokens: Vec<Token<'s>>,
    pos: usize,
}

impl<'s> Parser<'s> {
    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'s>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> Option<TokenKind> {
        self.current().map(|token| token.kind)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    fn at_comparison(&self) -> Option<ComparisonOperator> {
        self.current_kind().and_then(comparison_operator)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) -> Option<Token<'s>> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, reason: impl Into<String>) -> ConfigurationError {
        ConfigurationError::format(self.source, reason)
    }

    fn leaf_error(&self, operator: ComparisonOperator) -> ConfigurationError {
        self.error(format!(
            "operands of '{}' must be attribute references or string literals",
            operator.symbol()
        ))
    }

    // =========================================================================
    // Grammar
    // =========================================================================

    fn parse_or(&mut self) -> Result<Expression, ConfigurationError> {
        let mut left = self.parse_and()?;
        while self.eat(TokenKind::Or) {
            if self.current().is_none() {
                return Err(self.error("'Or' is missing its right operand"));
            }
            let right = self.parse_and()?;
            left = Expression::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression, ConfigurationError> {
        let mut left = self.parse_unary()?;
        while self.eat(TokenKind::And) {
            if self.current().is_none() {
                return Err(self.error("'And' is missing its right operand"));
            }
            let right = self.parse_unary()?;
            left = Expression::and(left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression, ConfigurationError> {
        if self.eat(TokenKind::Bang) {
            if self.current().is_none() {
                return Err(self.error("'!' is missing its operand"));
            }
            return Ok(Expression::not(self.parse_unary()?));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression, ConfigurationError> {
        let Some(kind) = self.current_kind() else {
            return Err(self.error("expected condition"));
        };
        match kind {
            TokenKind::LParen => {
                self.pos += 1;
                let inner = self.parse_or()?;
                if !self.eat(TokenKind::RParen) {
                    return Err(self.error("unmatched '('"));
                }
                if let Some(operator) = self.at_comparison() {
                    return Err(self.leaf_error(operator));
                }
                Ok(inner)
            }
            TokenKind::String | TokenKind::AttributeOpen => self.parse_comparison(),
            TokenKind::RParen => Err(self.error("unmatched ')'")),
            TokenKind::And
            | TokenKind::Or
            | TokenKind::Equal
            | TokenKind::NotEqual
            | TokenKind::Contains
            | TokenKind::Matches => Err(self.error(format!(
                "{} is missing its left operand",
                kind.describe()
            ))),
            TokenKind::Dot | TokenKind::Bang | TokenKind::Ident => {
                Err(self.error(format!("unexpected {}", kind.describe())))
            }
        }
    }

    fn parse_comparison(&mut self) -> Result<Expression, ConfigurationError> {
        let left = self.parse_operand()?;
        let Some(operator) = self.at_comparison() else {
            return Err(self.error(format!("expected comparison operator after {left}")));
        };
        self.pos += 1;
        match self.current_kind() {
            None => {
                return Err(self.error(format!(
                    "'{}' is missing its right operand",
                    operator.symbol()
                )));
            }
            Some(TokenKind::String | TokenKind::AttributeOpen) => {}
            Some(_) => return Err(self.leaf_error(operator)),
        }
        let right = self.parse_operand()?;
        if let Some(next) = self.at_comparison() {
            return Err(self.leaf_error(next));
        }
        Ok(Expression::compare(operator, left, right))
    }

    fn parse_operand(&mut self) -> Result<Operand, ConfigurationError> {
        match self.bump() {
            Some(Token {
                kind: TokenKind::String,
                text,
                ..
            }) => Ok(Operand::Literal(string_value(text))),
            Some(Token {
                kind: TokenKind::AttributeOpen,
                ..
            }) => self.parse_attribute().map(Operand::Attribute),
            Some(token) => Err(self.error(format!("unexpected {}", token.kind.describe()))),
            None => Err(self.error("expected operand")),
        }
    }

    /// The rest of `$( [scope "."] name )`, after `$(`.
    fn parse_attribute(&mut self) -> Result<AttributeReference, ConfigurationError> {
        let first = self.expect_ident()?;
        let reference = if self.eat(TokenKind::Dot) {
            let name = self.expect_ident()?;
            if first.eq_ignore_ascii_case("File") {
                FileAttribute::from_name(name)
                    .map(AttributeReference::File)
                    .ok_or_else(|| self.error(format!("unknown file attribute '{name}'")))?
            } else if first.eq_ignore_ascii_case("Element") {
                self.element_attribute(name)?
            } else {
                return Err(self.error(format!("unknown attribute scope '{first}'")));
            }
        } else {
            self.element_attribute(first)?
        };
        if !self.eat(TokenKind::RParen) {
            return Err(self.error("expected ')' to close attribute reference"));
        }
        Ok(reference)
    }

    fn element_attribute(&self, name: &str) -> Result<AttributeReference, ConfigurationError> {
        ElementAttribute::from_name(name)
            .map(AttributeReference::Element)
            .ok_or_else(|| self.error(format!("unknown attribute '{name}'")))
    }

    fn expect_ident(&mut self) -> Result<&'s str, ConfigurationError> {
        match self.current() {
            Some(Token {
                kind: TokenKind::Ident,
                text,
                ..
            }) => {
                let text = *text;
                self.pos += 1;
                Ok(text)
            }
            _ => Err(self.error("expected attribute name")),
        }
    }
}
