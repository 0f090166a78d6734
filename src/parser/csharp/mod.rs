//! C# element parser
//!
//! Drives the [`Scanner`] over brace-delimited scopes. At each position of
//! a scope the next significant character picks the construct: `}` closes
//! the scope, `#` starts a directive, `[` an attribute list, a comment marker
//! a comment, and anything else a declaration head (see `declarations`).

mod declarations;


use std::sync::Arc;

use tracing::{debug, trace};

use super::errors::{ErrorCode, ParseContext, SyntaxError};
use super::keywords::KeywordTable;
use super::scanner::{LiteralRules, Scanner, scan_line};
use super::scope::{DirectiveClosers, Scope};
use super::text::parse_attribute_list;
use super::ParserOptions;
use crate::base::Language;
use crate::elements::{CodeElement, CommentElement, RegionStyle, count_elements};

/// Parser for C# source files.
#[derive(Debug, Clone, Default)]
pub struct CSharpParser {
    options: ParserOptions,
}

impl CSharpParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn parse(&self, source: &str) -> Result<Vec<CodeElement>, SyntaxError> {
        let mut parser = Parser {
            scanner: Scanner::new(source, LiteralRules::CSHARP),
            options: &self.options,
            keywords: self.options.keyword_table(Language::CSharp),
            head_comments: Vec::new(),
        };
        let elements = parser.parse_scope(ScopeEnd::EndOfInput, ParseContext::TopLevel)?;
        debug!(
            top_level = elements.len(),
            total = count_elements(&elements, |_| true),
            "parsed C# source"
        );
        Ok(elements)
    }
}

/// What closes the scope being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeEnd {
    EndOfInput,
    Brace,
}

struct Parser<'o> {
    scanner: Scanner,
    options: &'o ParserOptions,
    keywords: Arc<dyn KeywordTable>,
    /// Comments met inside declaration heads, innermost declaration last
    head_comments: Vec<CommentElement>,
}

impl Parser<'_> {
    fn parse_scope(
        &mut self,
        end: ScopeEnd,
        context: ParseContext,
    ) -> Result<Vec<CodeElement>, SyntaxError> {
        let mut scope = Scope::new(context, DirectiveClosers::CSHARP);
        loop {
            if self.scanner.skip_whitespace() > 1 {
                scope.blank_line();
            }
            let at = self.scanner.position();
            match self.scanner.peek() {
                None => {
                    let elements = scope.finish(at)?;
                    if end == ScopeEnd::Brace {
                        return Err(SyntaxError::expected_closer("}", at, context));
                    }
                    return Ok(elements);
                }
                Some('}') => {
                    if end == ScopeEnd::EndOfInput {
                        return Err(SyntaxError::builder(ErrorCode::E0205)
                            .message("unexpected '}'")
                            .at(at)
                            .text("}")
                            .context(scope.context())
                            .build());
                    }
                    self.scanner.advance();
                    return scope.finish(at);
                }
                Some('#') => self.parse_directive(&mut scope)?,
                Some('[') => self.parse_attributes(&mut scope)?,
                Some(';') => {
                    self.scanner.advance();
                }
                Some(_) if self.scanner.at_comment() => {
                    let comment = self.scanner.read_comment()?;
                    scope.comment(comment, self.options.comment_regions.as_ref(), "//", at)?;
                }
                Some(_) => self.parse_declaration(&mut scope)?,
            }
        }
    }

    fn parse_directive(&mut self, scope: &mut Scope) -> Result<(), SyntaxError> {
        let at = self.scanner.position();
        let line = self.scanner.read_rest_of_line();
        let body = line.trim().trim_start_matches('#').trim_start();
        let (keyword, rest) = body
            .split_once(char::is_whitespace)
            .unwrap_or((body, ""));
        trace!(directive = keyword, line = at.line, "directive");
        let condition = || -> Result<String, SyntaxError> {
            let condition = scan_line(rest, LiteralRules::CSHARP).code;
            if condition.is_empty() {
                return Err(SyntaxError::builder(ErrorCode::E0505)
                    .message("expected condition")
                    .at(at)
                    .text(line.trim())
                    .context(ParseContext::Directive)
                    .build());
            }
            Ok(condition.to_string())
        };
        match keyword {
            "region" => scope.open_region(rest.trim(), RegionStyle::Directive, "#endregion", at),
            "endregion" => scope.close_region(RegionStyle::Directive, None, at)?,
            "if" => scope.open_conditional(condition()?, at),
            "elif" => scope.branch(Some(condition()?), at)?,
            "else" => scope.branch(None, at)?,
            "endif" => scope.close_conditional(at)?,
            "" => {
                return Err(SyntaxError::builder(ErrorCode::E0505)
                    .message("expected directive name")
                    .at(at)
                    .text(line.trim())
                    .context(ParseContext::Directive)
                    .build());
            }
            _ => scope.push_with_comments(CodeElement::raw_text(line.trim())),
        }
        Ok(())
    }

    /// `[...]`: assembly and module attributes stand alone, the rest wait
    /// for the declaration that follows.
    fn parse_attributes(&mut self, scope: &mut Scope) -> Result<(), SyntaxError> {
        let at = self.scanner.position();
        let inner = self
            .scanner
            .capture_block('[', ']', "]", ParseContext::AttributeList)?;
        let attribute = parse_attribute_list(&inner, LiteralRules::CSHARP, at)?;
        if attribute.is_file_level() {
            let mut element = CodeElement::attribute(attribute);
            element.trailing_comment = self.scanner.read_trailing_comment()?;
            scope.push_with_comments(element);
        } else {
            scope.push_attribute(attribute);
        }
        Ok(())
    }

    /// Skip whitespace inside a declaration, keeping any comments for the
    /// declaration being read.
    fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        loop {
            self.scanner.skip_whitespace();
            if !self.scanner.at_comment() {
                return Ok(());
            }
            let comment = self.scanner.read_comment()?;
            self.head_comments.push(comment);
        }
    }
}
