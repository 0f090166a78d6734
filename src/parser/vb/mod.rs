//! Visual Basic element parser
//!
//! Visual Basic is line oriented, so the parser works on logical lines (` _`
//! continuations merged) instead of characters. Each line is split into code
//! and a trailing comment by [`scan_line`]; the code then decides what the
//! line is:
//!
//! - empty: a comment line, or a blank line that detaches pending comments
//! - `#...`: a directive (`#Region`, `#If`, ...)
//! - `End <Keyword>`: closes the block being parsed
//! - `<...>`: attribute blocks, optionally followed by a declaration
//! - anything else: a statement (see `statements`)
//!
//! Member bodies are captured line by line up to their `End <Keyword>`
//! line. Comment lines and string literals never close a body, since only
//! the code part of a line is compared.

mod statements;

#[cfg(test)]
mod tests;

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, trace};

use super::errors::{ErrorCode, ParseContext, RelatedInfo, SyntaxError};
use super::keywords::KeywordTable;
use super::scanner::{LiteralRules, LogicalLine, Scanner, scan_line};
use super::scope::{DirectiveClosers, Scope};
use super::text::{dedent, find_top_level_word, parse_attribute_list, split_top_level};
use super::ParserOptions;
use crate::base::{Language, Position};
use crate::elements::{
    CodeElement, CommentElement, InterfaceReference, InterfaceReferenceType, RegionStyle,
    count_elements,
};

const RULES: LiteralRules = LiteralRules::VISUAL_BASIC;

/// Parser for Visual Basic source files.
#[derive(Debug, Clone, Default)]
pub struct VbParser {
    options: ParserOptions,
}

impl VbParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn parse(&self, source: &str) -> Result<Vec<CodeElement>, SyntaxError> {
        let mut parser = Parser {
            scanner: Scanner::new(source, RULES),
            lookahead: VecDeque::new(),
            options: &self.options,
            keywords: self.options.keyword_table(Language::VisualBasic),
        };
        let (elements, _) = parser.parse_block(Block::FILE, None)?;
        debug!(
            top_level = elements.len(),
            total = count_elements(&elements, |_| true),
            "parsed Visual Basic source"
        );
        Ok(elements)
    }
}

/// The block being parsed and the `End` statement that closes it.
#[derive(Debug, Clone, Copy)]
struct Block {
    /// Keyword following `End`; `None` for the whole file
    end: Option<&'static str>,
    context: ParseContext,
    /// Interface members are declared without bodies
    interface: bool,
}

impl Block {
    const FILE: Self = Self {
        end: None,
        context: ParseContext::TopLevel,
        interface: false,
    };
}

struct Parser<'o> {
    scanner: Scanner,
    /// Lines read ahead of the cursor, consumed before the scanner
    lookahead: VecDeque<LogicalLine>,
    options: &'o ParserOptions,
    keywords: Arc<dyn KeywordTable>,
}

/// `Some(keyword)` when `code` is an `End <Keyword>` statement.
fn end_keyword(code: &str) -> Option<&str> {
    let mut words = code.split_whitespace();
    let first = words.next()?;
    let keyword = words.next()?;
    (first.eq_ignore_ascii_case("End") && words.next().is_none()).then_some(keyword)
}

/// Position of the first code character of a line.
fn code_position(line: &LogicalLine) -> Position {
    let indent = line.text.chars().take_while(|c| c.is_whitespace()).count();
    Position::new(line.start().line, line.start().column + indent)
}

/// Strip the quotes off a string literal, undoubling inner quotes.
fn unquote(text: &str) -> String {
    let text = text.trim();
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .map(|inner| inner.replace("\"\"", "\""))
        .unwrap_or_else(|| text.to_string())
}

/// `Some("Sub")` / `Some("Function")` when the code line opens a multi-line
/// lambda that will be closed by its own `End Sub` / `End Function`.
fn opens_lambda(code: &str) -> Option<&'static str> {
    for keyword in ["Sub", "Function"] {
        let Some(offset) = find_top_level_word(code, keyword, true, RULES) else {
            continue;
        };
        if offset == 0 {
            continue;
        }
        let rest = code[offset + keyword.len()..].trim_start();
        if !rest.starts_with('(') {
            continue;
        }
        let mut cursor = Scanner::new(rest, RULES);
        if cursor
            .capture_block('(', ')', ")", ParseContext::MemberBody)
            .is_err()
        {
            continue;
        }
        cursor.skip_inline_whitespace();
        if cursor.is_eof() || cursor.starts_with_word("As", true) {
            return Some(keyword);
        }
    }
    None
}

impl Parser<'_> {
    fn next_line(&mut self) -> Option<LogicalLine> {
        self.lookahead
            .pop_front()
            .or_else(|| self.scanner.read_logical_line())
    }

    /// Code of the next line that has any, without consuming it.
    fn peek_code(&mut self) -> Option<String> {
        let mut index = 0;
        loop {
            if index == self.lookahead.len() {
                let line = self.scanner.read_logical_line()?;
                self.lookahead.push_back(line);
            }
            let code = scan_line(&self.lookahead[index].text, RULES).code;
            if !code.is_empty() {
                return Some(code.to_string());
            }
            index += 1;
        }
    }

    /// Parse the statements of `block` up to its `End` line. Returns the
    /// elements and the comment on the closing line.
    fn parse_block(
        &mut self,
        block: Block,
        mut interfaces: Option<&mut Vec<InterfaceReference>>,
    ) -> Result<(Vec<CodeElement>, Option<CommentElement>), SyntaxError> {
        let mut scope = Scope::new(block.context, DirectiveClosers::VISUAL_BASIC);
        loop {
            let Some(line) = self.next_line() else {
                let at = self.scanner.position();
                let elements = scope.finish(at)?;
                return match block.end {
                    Some(keyword) => Err(SyntaxError::expected_closer(
                        &format!("End {keyword}"),
                        at,
                        block.context,
                    )),
                    None => Ok((elements, None)),
                };
            };
            if line.is_blank() {
                scope.blank_line();
                continue;
            }
            let at = code_position(&line);
            let scanned = scan_line(&line.text, RULES);
            let code = scanned.code;
            if code.is_empty() {
                if let Some(comment) = scanned.comment {
                    scope.comment(comment, self.options.comment_regions.as_ref(), "'", at)?;
                }
                continue;
            }
            if code.starts_with('#') {
                self.parse_directive(&mut scope, code, at)?;
                continue;
            }
            if let Some(keyword) = end_keyword(code) {
                return match block.end {
                    Some(expected) if expected.eq_ignore_ascii_case(keyword) => {
                        Ok((scope.finish(at)?, scanned.comment))
                    }
                    Some(expected) => Err(SyntaxError::builder(ErrorCode::E0206)
                        .message(format!("expected 'End {expected}'"))
                        .at(at)
                        .text(code)
                        .context(scope.context())
                        .build()),
                    None => Err(SyntaxError::builder(ErrorCode::E0205)
                        .message(format!("unexpected '{code}'"))
                        .at(at)
                        .text(code)
                        .context(scope.context())
                        .build()),
                };
            }
            if let Some(list) = interfaces.as_deref_mut() {
                if let Some(references) = inheritance_clause(code) {
                    list.extend(references);
                    continue;
                }
            }
            let mut cursor = Scanner::new(code, RULES).with_origin(at);
            if self.parse_attributes(&mut scope, &mut cursor)? {
                continue;
            }
            self.parse_statement(&mut scope, block, &mut cursor, scanned.comment)?;
        }
    }

    fn parse_directive(
        &mut self,
        scope: &mut Scope,
        code: &str,
        at: Position,
    ) -> Result<(), SyntaxError> {
        let body = code[1..].trim();
        let (keyword, rest) = body
            .split_once(char::is_whitespace)
            .unwrap_or((body, ""));
        let rest = rest.trim();
        trace!(directive = keyword, line = at.line, "directive");
        let invalid = |message: &str| {
            SyntaxError::builder(ErrorCode::E0505)
                .message(message)
                .at(at)
                .text(code)
                .context(ParseContext::Directive)
                .build()
        };
        let condition = || {
            let condition = match rest.len().checked_sub(4) {
                Some(cut)
                    if rest.is_char_boundary(cut)
                        && rest[cut..].eq_ignore_ascii_case("then") =>
                {
                    rest[..cut].trim()
                }
                _ => rest,
            };
            if condition.is_empty() {
                return Err(invalid("expected condition"));
            }
            Ok(condition.to_string())
        };
        match keyword.to_ascii_lowercase().as_str() {
            "region" => {
                let name = unquote(rest);
                if name.is_empty() {
                    return Err(invalid("expected region name"));
                }
                scope.open_region(name, RegionStyle::Directive, "#End Region", at);
            }
            "if" => scope.open_conditional(condition()?, at),
            "elseif" => scope.branch(Some(condition()?), at)?,
            "else" => scope.branch(None, at)?,
            "end" => match rest.to_ascii_lowercase().as_str() {
                "region" => scope.close_region(RegionStyle::Directive, None, at)?,
                "if" => scope.close_conditional(at)?,
                _ => return Err(invalid("unknown end directive")),
            },
            "" => return Err(invalid("expected directive name")),
            _ => scope.push_with_comments(CodeElement::raw_text(code)),
        }
        Ok(())
    }

    /// Read the `<...>` attribute blocks at the start of a line. Returns true
    /// when nothing follows them.
    fn parse_attributes(
        &mut self,
        scope: &mut Scope,
        cursor: &mut Scanner,
    ) -> Result<bool, SyntaxError> {
        while cursor.peek() == Some('<') {
            let at = cursor.position();
            let inner = cursor.capture_block('<', '>', ">", ParseContext::AttributeList)?;
            let attribute = parse_attribute_list(&inner, RULES, at)?;
            if attribute.is_file_level() {
                scope.push_with_comments(CodeElement::attribute(attribute));
            } else {
                scope.push_attribute(attribute);
            }
            cursor.skip_inline_whitespace();
        }
        Ok(cursor.is_eof())
    }

    /// Capture body lines up to `End <keyword>`, returning the dedented
    /// text between the header and the closing line, and the closing line's
    /// comment.
    fn capture_body(
        &mut self,
        keyword: &'static str,
        opened_at: Position,
    ) -> Result<(String, Option<CommentElement>), SyntaxError> {
        let mut lines: Vec<String> = Vec::new();
        let mut lambdas: Vec<&'static str> = Vec::new();
        let closing = loop {
            let Some(line) = self.next_line() else {
                return Err(SyntaxError::expected_closer(
                    &format!("End {keyword}"),
                    self.scanner.position(),
                    ParseContext::MemberBody,
                )
                .with_related(RelatedInfo::new("block opened here", opened_at)));
            };
            let scanned = scan_line(&line.text, RULES);
            let code = scanned.code;
            if let Some(end) = end_keyword(code) {
                match lambdas.last().copied() {
                    Some(open) if open.eq_ignore_ascii_case(end) => {
                        lambdas.pop();
                    }
                    _ if keyword.eq_ignore_ascii_case(end) => break scanned.comment,
                    _ => {}
                }
            } else if let Some(lambda) = opens_lambda(code) {
                lambdas.push(lambda);
            }
            lines.push(line.raw);
        };
        Ok((dedent(&format!("\n{}", lines.join("\n"))), closing))
    }
}

/// `Inherits A, B` / `Implements I, J` lines at the top of a type body.
fn inheritance_clause(code: &str) -> Option<Vec<InterfaceReference>> {
    let (keyword, rest) = code.split_once(char::is_whitespace)?;
    let reference_type = if keyword.eq_ignore_ascii_case("Inherits") {
        InterfaceReferenceType::Class
    } else if keyword.eq_ignore_ascii_case("Implements") {
        InterfaceReferenceType::Interface
    } else {
        return None;
    };
    Some(
        split_top_level(rest, ',', RULES)
            .into_iter()
            .map(|name| InterfaceReference::new(name, reference_type))
            .collect(),
    )
}
