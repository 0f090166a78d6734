//! Character scanner shared by the C# and Visual Basic parsers
//!
//! The scanner knows how each language quotes strings and writes comments,
//! and nothing about declarations. Its job is to move over source text while
//! keeping strings and comments inert: a brace, parenthesis or `End Sub`
//! inside a literal or comment never counts as structure.
//!
//! It provides:
//! - One-character lookahead with 1-based line/column tracking
//! - Literal and comment readers that raise [`SyntaxError`] when unterminated
//! - Block capture (`capture_block`, `capture_until`) with depth bookkeeping
//! - Per-line classification (`scan_line`) splitting code from a trailing comment
//! - Logical line reading with ` _` continuation merging

use unicode_ident::{is_xid_continue, is_xid_start};

use super::errors::{ErrorCode, ParseContext, RelatedInfo, SyntaxError};
use crate::base::{Language, Position, Span};
use crate::elements::CommentElement;

/// How a language writes literals and comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralRules {
    /// `\"` escapes inside regular strings
    pub backslash_escapes: bool,
    /// `@"..."` strings that may span lines and escape quotes by doubling
    pub verbatim_strings: bool,
    /// `'c'` character literals
    pub char_literals: bool,
    pub line_comment: &'static str,
    pub xml_comment: &'static str,
    /// `/* ... */`
    pub block_comments: bool,
    /// `REM` comments
    pub rem_comments: bool,
    /// Lines starting with `#` are preprocessor lines
    pub preprocessor_lines: bool,
    /// Prefix that turns a keyword into an identifier (`@class`)
    pub identifier_prefix: Option<char>,
}

impl LiteralRules {
    pub const CSHARP: Self = Self {
        backslash_escapes: true,
        verbatim_strings: true,
        char_literals: true,
        line_comment: "//",
        xml_comment: "///",
        block_comments: true,
        rem_comments: false,
        preprocessor_lines: true,
        identifier_prefix: Some('@'),
    };

    pub const VISUAL_BASIC: Self = Self {
        backslash_escapes: false,
        verbatim_strings: false,
        char_literals: false,
        line_comment: "'",
        xml_comment: "'''",
        block_comments: false,
        rem_comments: true,
        preprocessor_lines: false,
        identifier_prefix: None,
    };

    pub fn for_language(language: Language) -> Self {
        match language {
            Language::CSharp => Self::CSHARP,
            Language::VisualBasic => Self::VISUAL_BASIC,
        }
    }
}

/// Nesting-depth counter for block openers and closers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Depth(usize);

impl Depth {
    pub fn get(self) -> usize {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn open(&mut self) {
        self.0 += 1;
    }

    /// Record a closer. A closer with nothing open is an error.
    pub fn close(&mut self, position: Position, closer: char) -> Result<(), SyntaxError> {
        if self.0 == 0 {
            return Err(SyntaxError::builder(ErrorCode::E0205)
                .message(format!("unexpected closer '{closer}'"))
                .at(position)
                .text(closer.to_string())
                .build());
        }
        self.0 -= 1;
        Ok(())
    }
}

/// A source line after continuation merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// Merged text, continuation markers removed
    pub text: String,
    /// The physical lines as written, joined with `\n`
    pub raw: String,
    /// Lines covered by this logical line
    pub span: Span,
}

impl LogicalLine {
    pub fn start(&self) -> Position {
        self.span.start
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A line split into code and an optional trailing comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine<'a> {
    /// Code before the comment, trimmed
    pub code: &'a str,
    pub comment: Option<CommentElement>,
}

pub fn is_identifier_start(c: char) -> bool {
    c == '_' || is_xid_start(c)
}

pub fn is_identifier_continue(c: char) -> bool {
    is_xid_continue(c)
}

/// Whether the `<` that starts `rest` opens a generic argument list rather
/// than a comparison or shift: the list must close before any character
/// that cannot appear in type text.
pub fn opens_type_arguments(rest: impl IntoIterator<Item = char>) -> bool {
    let mut nesting = 0usize;
    for c in rest {
        match c {
            '<' => nesting += 1,
            '>' => {
                nesting = nesting.saturating_sub(1);
                if nesting == 0 {
                    return true;
                }
            }
            ',' | '.' | '?' | '[' | ']' | '(' | ')' | '*' | ':' => {}
            c if c.is_whitespace() || is_identifier_continue(c) => {}
            _ => return false,
        }
    }
    false
}

/// Split `line` into code and trailing comment. Comment markers inside
/// string literals are ignored.
pub fn scan_line(line: &str, rules: LiteralRules) -> ScannedLine<'_> {
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut in_string = false;
    let mut verbatim = false;
    let mut in_char = false;
    let mut i = 0;
    while i < chars.len() {
        let (offset, c) = chars[i];
        if in_string {
            if verbatim {
                if c == '"' {
                    if chars.get(i + 1).is_some_and(|&(_, n)| n == '"') {
                        i += 2;
                        continue;
                    }
                    in_string = false;
                }
            } else if c == '\\' && rules.backslash_escapes {
                i += 2;
                continue;
            } else if c == '"' {
                in_string = false;
            }
        } else if in_char {
            if c == '\\' {
                i += 2;
                continue;
            }
            if c == '\'' {
                in_char = false;
            }
        } else if c == '"' {
            in_string = true;
            // `@"`, `$@"` or `@$"`
            verbatim = rules.verbatim_strings
                && chars[i.saturating_sub(2)..i].iter().any(|&(_, p)| p == '@');
        } else if c == '\'' && rules.char_literals {
            in_char = true;
        } else if line[offset..].starts_with(rules.line_comment) {
            let rest = &line[offset..];
            let comment = if rest.starts_with(rules.xml_comment) {
                CommentElement::xml_line(rest[rules.xml_comment.len()..].trim_end())
            } else {
                CommentElement::line(rest[rules.line_comment.len()..].trim_end())
            };
            return ScannedLine {
                code: line[..offset].trim(),
                comment: Some(comment),
            };
        } else if rules.rem_comments
            && line
                .get(offset..offset + 3)
                .is_some_and(|word| word.eq_ignore_ascii_case("rem"))
            && (i == 0 || chars[i - 1].1.is_whitespace() || chars[i - 1].1 == ':')
            && chars.get(i + 3).is_none_or(|&(_, n)| n.is_whitespace())
        {
            return ScannedLine {
                code: line[..offset].trim(),
                comment: Some(CommentElement::line(line[offset + 3..].trim_end())),
            };
        }
        i += 1;
    }
    ScannedLine {
        code: line.trim(),
        comment: None,
    }
}

/// Character cursor over one source text.
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    line_has_code: bool,
    rules: LiteralRules,
}

impl Scanner {
    pub fn new(source: &str, rules: LiteralRules) -> Self {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            line_has_code: false,
            rules,
        }
    }

    /// Report positions relative to `origin`, for scanning a fragment cut
    /// out of a larger file.
    pub fn with_origin(mut self, origin: Position) -> Self {
        self.line = origin.line;
        self.column = origin.column;
        self
    }

    pub fn rules(&self) -> LiteralRules {
        self.rules
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    pub fn starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    /// Whether the input continues with `word` as a whole word.
    pub fn starts_with_word(&self, word: &str, ignore_case: bool) -> bool {
        let len = word.chars().count();
        let matches = word.chars().enumerate().all(|(i, c)| {
            self.peek_at(i).is_some_and(|actual| {
                if ignore_case {
                    actual.eq_ignore_ascii_case(&c)
                } else {
                    actual == c
                }
            })
        });
        matches && !self.peek_at(len).is_some_and(is_identifier_continue)
    }

    /// Whether only whitespace precedes the cursor on the current line.
    pub fn at_line_start(&self) -> bool {
        !self.line_has_code
    }

    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.line_has_code = false;
        } else {
            self.column += 1;
            if !c.is_whitespace() {
                self.line_has_code = true;
            }
        }
        Some(c)
    }

    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn eat_str(&mut self, expected: &str) -> bool {
        if !self.starts_with(expected) {
            return false;
        }
        for _ in expected.chars() {
            self.advance();
        }
        true
    }

    /// Consume `expected` or fail naming it.
    pub fn expect(&mut self, expected: char, context: ParseContext) -> Result<(), SyntaxError> {
        if self.eat(expected) {
            return Ok(());
        }
        let found = self.peek().map(String::from).unwrap_or_default();
        Err(SyntaxError::builder(ErrorCode::E0201)
            .message(format!("expected '{expected}'"))
            .at(self.position())
            .text(found)
            .context(context)
            .build())
    }

    /// Skip spaces and tabs on the current line.
    pub fn skip_inline_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.advance();
        }
    }

    /// Skip all whitespace, returning the number of line breaks crossed.
    pub fn skip_whitespace(&mut self) -> usize {
        let mut newlines = 0;
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            if c == '\n' {
                newlines += 1;
            }
            self.advance();
        }
        newlines
    }

    pub fn read_identifier(&mut self) -> Option<String> {
        let mut ident = String::new();
        let prefixed = self.rules.identifier_prefix.is_some_and(|prefix| {
            self.peek() == Some(prefix) && self.peek_at(1).is_some_and(is_identifier_start)
        });
        if prefixed {
            ident.extend(self.advance());
        }
        if !self.peek().is_some_and(is_identifier_start) {
            return None;
        }
        while let Some(c) = self.peek() {
            if !is_identifier_continue(c) {
                break;
            }
            ident.push(c);
            self.advance();
        }
        Some(ident)
    }

    /// Rest of the current line without its line break. The break itself is
    /// left for the caller's whitespace skipping.
    pub fn read_rest_of_line(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        if text.ends_with('\r') {
            text.pop();
        }
        text
    }

    pub fn at_comment(&self) -> bool {
        self.starts_with(self.rules.line_comment)
            || (self.rules.block_comments && self.starts_with("/*"))
            || (self.rules.rem_comments && self.starts_with_word("REM", true))
    }

    /// Read the comment at the cursor. Line comments stop before the line
    /// break.
    pub fn read_comment(&mut self) -> Result<CommentElement, SyntaxError> {
        if self.rules.block_comments && self.starts_with("/*") {
            let start = self.position();
            self.eat_str("/*");
            let mut text = String::new();
            loop {
                if self.eat_str("*/") {
                    return Ok(CommentElement::block(text));
                }
                match self.advance() {
                    Some(c) => text.push(c),
                    None => {
                        return Err(SyntaxError::builder(ErrorCode::E0103)
                            .message("unterminated block comment")
                            .at(start)
                            .text(format!("/*{text}"))
                            .hint("add '*/' to close the comment")
                            .build());
                    }
                }
            }
        }
        if self.eat_str(self.rules.xml_comment) {
            return Ok(CommentElement::xml_line(self.read_rest_of_line().trim_end()));
        }
        if self.eat_str(self.rules.line_comment) {
            return Ok(CommentElement::line(self.read_rest_of_line().trim_end()));
        }
        if self.rules.rem_comments && self.starts_with_word("REM", true) {
            for _ in 0..3 {
                self.advance();
            }
            return Ok(CommentElement::line(self.read_rest_of_line().trim_end()));
        }
        Err(SyntaxError::builder(ErrorCode::E0999)
            .message("no comment at cursor")
            .at(self.position())
            .build())
    }

    /// A line comment on the rest of the current line, if any.
    pub fn read_trailing_comment(&mut self) -> Result<Option<CommentElement>, SyntaxError> {
        self.skip_inline_whitespace();
        if self.starts_with(self.rules.line_comment)
            || (self.rules.rem_comments && self.starts_with_word("REM", true))
        {
            return self.read_comment().map(Some);
        }
        Ok(None)
    }

    pub fn at_string_start(&self) -> bool {
        match self.peek() {
            Some('"') => true,
            Some('@' | '$') if self.rules.verbatim_strings => match self.peek_at(1) {
                Some('"') => true,
                Some('@' | '$') => self.peek_at(2) == Some('"'),
                _ => false,
            },
            _ => false,
        }
    }

    /// Read a string literal, appending its raw text to `out`.
    pub fn read_string(&mut self, out: &mut String) -> Result<(), SyntaxError> {
        let start = self.position();
        let mut verbatim = false;
        while let Some(c) = self.peek() {
            if c == '"' {
                break;
            }
            verbatim |= c == '@';
            out.push(c);
            self.advance();
        }
        if self.advance().is_none() {
            return Err(unterminated_string(start, out));
        }
        out.push('"');
        let doubled_quotes = verbatim || !self.rules.backslash_escapes;
        loop {
            let Some(c) = self.advance() else {
                return Err(unterminated_string(start, out));
            };
            if c == '\n' && !verbatim {
                return Err(unterminated_string(start, out));
            }
            out.push(c);
            match c {
                '\\' if self.rules.backslash_escapes && !verbatim => match self.advance() {
                    Some('\n') | None => return Err(unterminated_string(start, out)),
                    Some(escaped) => out.push(escaped),
                },
                '"' if doubled_quotes && self.peek() == Some('"') => {
                    self.advance();
                    out.push('"');
                }
                '"' => return Ok(()),
                _ => {}
            }
        }
    }

    /// Read a character literal, appending its raw text to `out`.
    pub fn read_char_literal(&mut self, out: &mut String) -> Result<(), SyntaxError> {
        let start = self.position();
        self.advance();
        out.push('\'');
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(SyntaxError::builder(ErrorCode::E0104)
                        .message("unterminated character literal")
                        .at(start)
                        .text(out.clone())
                        .build());
                }
                Some('\\') => {
                    out.push('\\');
                    out.extend(self.advance());
                }
                Some('\'') => {
                    out.push('\'');
                    return Ok(());
                }
                Some(c) => out.push(c),
            }
        }
    }

    /// Consume a string, character literal, comment or preprocessor line at
    /// the cursor, appending its raw text to `out`. Returns false when the
    /// cursor is on ordinary code.
    fn skip_inert(&mut self, out: &mut String) -> Result<bool, SyntaxError> {
        if self.at_string_start() {
            self.read_string(out)?;
            return Ok(true);
        }
        if self.rules.char_literals && self.peek() == Some('\'') {
            self.read_char_literal(out)?;
            return Ok(true);
        }
        if self.rules.block_comments && self.starts_with("/*") {
            let comment = self.read_comment()?;
            out.push_str("/*");
            out.push_str(&comment.text);
            out.push_str("*/");
            return Ok(true);
        }
        if self.starts_with(self.rules.line_comment)
            || (self.rules.preprocessor_lines && self.peek() == Some('#') && self.at_line_start())
        {
            out.push_str(&self.read_rest_of_line());
            return Ok(true);
        }
        Ok(false)
    }

    /// Capture the text between `open` at the cursor and its matching
    /// `close`, consuming both. Nested pairs and inert text are kept in the
    /// returned text; reaching end of input names `closer` as expected.
    pub fn capture_block(
        &mut self,
        open: char,
        close: char,
        closer: &str,
        context: ParseContext,
    ) -> Result<String, SyntaxError> {
        let opened_at = self.position();
        self.expect(open, context)?;
        let mut depth = Depth::default();
        depth.open();
        let mut text = String::new();
        loop {
            if self.skip_inert(&mut text)? {
                continue;
            }
            let Some(c) = self.peek() else {
                return Err(SyntaxError::expected_closer(closer, self.position(), context)
                    .with_related(RelatedInfo::new("block opened here", opened_at)));
            };
            if c == open {
                depth.open();
            } else if c == close {
                depth.close(self.position(), close)?;
                if depth.is_zero() {
                    self.advance();
                    return Ok(text);
                }
            }
            text.push(c);
            self.advance();
        }
    }

    /// Capture text up to (not including) the first of `terminators` found
    /// outside nested brackets, generic argument lists and inert text.
    pub fn capture_until(
        &mut self,
        terminators: &[char],
        expected: &str,
        context: ParseContext,
    ) -> Result<String, SyntaxError> {
        let mut depth = Depth::default();
        let mut angles = 0usize;
        let mut previous: Option<char> = None;
        let mut text = String::new();
        loop {
            if self.skip_inert(&mut text)? {
                previous = None;
                continue;
            }
            let Some(c) = self.peek() else {
                return Err(SyntaxError::expected_closer(expected, self.position(), context));
            };
            if depth.is_zero() && angles == 0 && terminators.contains(&c) {
                return Ok(text);
            }
            match c {
                '(' | '[' | '{' => depth.open(),
                ')' | ']' | '}' => depth
                    .close(self.position(), c)
                    .map_err(|err| err.with_context(context))?,
                '<' if previous.is_some_and(is_identifier_continue)
                    && opens_type_arguments(self.chars[self.pos..].iter().copied()) =>
                {
                    angles += 1
                }
                '>' if angles > 0 => angles -= 1,
                _ => {}
            }
            text.push(c);
            self.advance();
            previous = Some(c);
        }
    }

    /// Read one physical line including its break. Returns `None` at end of
    /// input.
    fn read_physical_line(&mut self) -> Option<String> {
        if self.is_eof() {
            return None;
        }
        let line = self.read_rest_of_line();
        self.eat('\n');
        Some(line)
    }

    /// Read one logical line, merging physical lines that end in a ` _`
    /// continuation marker.
    pub fn read_logical_line(&mut self) -> Option<LogicalLine> {
        let start = self.position();
        let first = self.read_physical_line()?;
        let mut text = String::new();
        let mut raw = first.clone();
        let mut physical = first;
        let mut end = start;
        loop {
            let code = scan_line(&physical, self.rules).code;
            let continued = code == "_"
                || (code.ends_with('_')
                    && code[..code.len() - 1].ends_with(char::is_whitespace));
            if !continued {
                text.push_str(&physical);
                break;
            }
            let cut = physical.rfind('_').unwrap_or(physical.len());
            text.push_str(physical[..cut].trim_end());
            text.push(' ');
            end = self.position();
            match self.read_physical_line() {
                Some(next) => {
                    raw.push('\n');
                    raw.push_str(&next);
                    physical = next.trim_start().to_string();
                }
                None => break,
            }
        }
        Some(LogicalLine {
            text,
            raw,
            span: Span::new(start, Position::new(end.line, 1)),
        })
    }
}

fn unterminated_string(start: Position, text: &str) -> SyntaxError {
    SyntaxError::builder(ErrorCode::E0102)
        .message("unterminated string literal")
        .at(start)
        .text(text)
        .hint("add a closing '\"'")
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::CommentType;

    fn csharp(source: &str) -> Scanner {
        Scanner::new(source, LiteralRules::CSHARP)
    }

    #[test]
    fn test_positions_are_one_based() {
        let mut scanner = csharp("ab\ncd");
        assert_eq!(scanner.position(), Position::new(1, 1));
        scanner.advance();
        scanner.advance();
        scanner.advance();
        assert_eq!(scanner.position(), Position::new(2, 1));
    }

    #[test]
    fn test_capture_block_ignores_braces_in_literals() {
        let mut scanner = csharp("{ var s = \"}\"; // }\n char c = '}'; /* } */ }rest");
        let text = scanner
            .capture_block('{', '}', "}", ParseContext::MemberBody)
            .unwrap();
        assert!(text.contains("\"}\""));
        assert_eq!(scanner.peek(), Some('r'));
    }

    #[test]
    fn test_capture_block_verbatim_string() {
        let mut scanner = csharp("{ x = @\"a \"\" } b\"; }");
        let text = scanner
            .capture_block('{', '}', "}", ParseContext::MemberBody)
            .unwrap();
        assert!(text.contains("@\"a \"\" } b\""));
        assert!(scanner.is_eof());
    }

    #[test]
    fn test_capture_block_unclosed_names_closer() {
        let mut scanner = csharp("{\n  int x;\n");
        let err = scanner
            .capture_block('{', '}', "}", ParseContext::MemberBody)
            .unwrap_err();
        assert_eq!(err.message, "expected '}'");
        assert_eq!(err.position, Position::new(3, 1));
        assert_eq!(err.related[0].position, Position::new(1, 1));
    }

    #[test]
    fn test_unterminated_string() {
        let mut scanner = csharp("\"abc\nx");
        let mut out = String::new();
        let err = scanner.read_string(&mut out).unwrap_err();
        assert_eq!(err.code, ErrorCode::E0102);
        assert_eq!(err.position, Position::new(1, 1));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let mut scanner = csharp("/* never closed");
        let err = scanner.read_comment().unwrap_err();
        assert_eq!(err.code, ErrorCode::E0103);
    }

    #[test]
    fn test_capture_until_respects_nesting() {
        let mut scanner = csharp("new Dictionary<int, string> { { 1, \"a;\" } }, next;");
        let text = scanner
            .capture_until(&[',', ';'], ";", ParseContext::Declaration)
            .unwrap();
        assert_eq!(text, "new Dictionary<int, string> { { 1, \"a;\" } }");
        assert_eq!(scanner.peek(), Some(','));
    }

    #[test]
    fn test_capture_until_unexpected_closer() {
        let mut scanner = csharp("a) ;");
        let err = scanner
            .capture_until(&[';'], ";", ParseContext::Declaration)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::E0205);
        assert!(err.message.contains("unexpected closer"));
    }

    #[test]
    fn test_depth_underflow() {
        let mut depth = Depth::default();
        depth.open();
        assert!(depth.close(Position::start(), '}').is_ok());
        assert!(depth.close(Position::start(), '}').is_err());
    }

    #[test]
    fn test_scan_line_vb_comment_outside_string() {
        let line = scan_line("x = \"it's\" ' note", LiteralRules::VISUAL_BASIC);
        assert_eq!(line.code, "x = \"it's\"");
        assert_eq!(line.comment, Some(CommentElement::line(" note")));
    }

    #[test]
    fn test_scan_line_vb_rem_and_xml() {
        let rem = scan_line("REM old style", LiteralRules::VISUAL_BASIC);
        assert_eq!(rem.code, "");
        assert_eq!(rem.comment, Some(CommentElement::line(" old style")));

        let xml = scan_line("''' <summary>", LiteralRules::VISUAL_BASIC);
        assert_eq!(xml.comment.map(|c| c.comment_type), Some(CommentType::XmlLine));

        let word = scan_line("Dim remainder As Integer", LiteralRules::VISUAL_BASIC);
        assert!(word.comment.is_none());
    }

    #[test]
    fn test_scan_line_csharp_char_literal_quote() {
        let line = scan_line("char c = '\"'; // quote", LiteralRules::CSHARP);
        assert_eq!(line.code, "char c = '\"';");
        assert_eq!(line.comment, Some(CommentElement::line(" quote")));
    }

    #[test]
    fn test_scan_line_verbatim_string_ending_in_backslash() {
        let line = scan_line("var p = @\"C:\\\"; // path", LiteralRules::CSHARP);
        assert_eq!(line.code, "var p = @\"C:\\\";");
        assert_eq!(line.comment, Some(CommentElement::line(" path")));

        let doubled = scan_line("var q = @\"say \"\"//\"\"\"; // quoted", LiteralRules::CSHARP);
        assert_eq!(doubled.comment, Some(CommentElement::line(" quoted")));
    }

    #[test]
    fn test_opens_type_arguments() {
        assert!(opens_type_arguments("<int, string> x".chars()));
        assert!(opens_type_arguments("<List<int?>[]>()".chars()));
        assert!(!opens_type_arguments("<y; int z;".chars()));
        assert!(!opens_type_arguments("<<3;".chars()));
        assert!(!opens_type_arguments("< b + 1 > c".chars()));
    }

    #[test]
    fn test_capture_until_comparison_and_shift() {
        let mut scanner = csharp("x<y, 1<<3; rest");
        let first = scanner
            .capture_until(&[',', ';'], ";", ParseContext::Declaration)
            .unwrap();
        assert_eq!(first, "x<y");
        scanner.advance();
        let second = scanner
            .capture_until(&[',', ';'], ";", ParseContext::Declaration)
            .unwrap();
        assert_eq!(second, " 1<<3");
        assert_eq!(scanner.peek(), Some(';'));
    }

    #[test]
    fn test_logical_line_continuation() {
        let mut scanner = Scanner::new(
            "Public Sub Foo(ByVal a As Integer, _\n    ByVal b As Integer)\nEnd Sub\n",
            LiteralRules::VISUAL_BASIC,
        );
        let line = scanner.read_logical_line().unwrap();
        assert_eq!(
            line.text,
            "Public Sub Foo(ByVal a As Integer, ByVal b As Integer)"
        );
        assert_eq!(line.start(), Position::new(1, 1));
        assert!(line.raw.contains('\n'));
        let next = scanner.read_logical_line().unwrap();
        assert_eq!(next.text, "End Sub");
        assert_eq!(next.start().line, 3);
        assert!(scanner.read_logical_line().is_none());
    }

    #[test]
    fn test_identifier_prefix() {
        let mut scanner = csharp("@class rest");
        assert_eq!(scanner.read_identifier().as_deref(), Some("@class"));
        let mut vb = Scanner::new("_value1 x", LiteralRules::VISUAL_BASIC);
        assert_eq!(vb.read_identifier().as_deref(), Some("_value1"));
    }
}
