//! C# declaration heads and the elements built from them.
//!
//! A declaration head is the run of words before the first `(`, `{`, `;`,
//! `=`, `,` or `:`. Leading access and modifier keywords are stripped off;
//! the remaining words and the terminator decide the construct:
//!
//! | Words                      | Terminator      | Construct               |
//! |----------------------------|-----------------|-------------------------|
//! | `namespace N`              | `{` / `;`       | namespace               |
//! | `using ...`                | `;` / `=`       | using directive         |
//! | `class`/`struct`/... `N`   | `{` `:` `where` | type                    |
//! | `delegate T N`             | `(`             | delegate                |
//! | `event T N`                | `;` `,` `{` `=` | event(s)                |
//! | `N` / `~N`                 | `(`             | constructor / finalizer |
//! | `T N`, `T operator op`     | `(`             | method / operator       |
//! | `T N`, `T this[...]`       | `{` / `=>`      | property / indexer      |
//! | `T N`                      | `;` `,` `=`     | field(s)                |

use tracing::trace;

use super::{Parser, ScopeEnd};
use crate::base::Position;
use crate::elements::{
    CodeAccess, CodeElement, CommentElement, ConstructorElement, DelegateElement, ElementKind, EventElement,
    FieldElement, InterfaceReference, InterfaceReferenceType, MethodElement, Modifiers,
    OperatorType, PropertyElement, TypeElementType, TypeParameter, UsingElement,
};
use crate::parser::errors::{ErrorCode, ParseContext, SyntaxError, format_context_error};
use crate::parser::scanner::{LiteralRules, is_identifier_start};
use crate::parser::scope::Scope;
use crate::parser::text::{
    apply_where_clauses, dedent, find_top_level_word, parse_csharp_type_parameters,
    split_top_level,
};

/// Character that ended a declaration head. The cursor is left on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeadEnd {
    Paren,
    Brace,
    Semicolon,
    Comma,
    Assign,
    Arrow,
    Colon,
    Where,
}

impl HeadEnd {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Paren => "(",
            Self::Brace => "{",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::Assign => "=",
            Self::Arrow => "=>",
            Self::Colon => ":",
            Self::Where => "where",
        }
    }
}

#[derive(Debug)]
struct Head {
    words: Vec<String>,
    index_parameter: Option<String>,
    end: HeadEnd,
    start: Position,
}

struct Declarator {
    name: String,
    initial_value: Option<String>,
}

fn access_keyword(word: &str) -> Option<CodeAccess> {
    match word {
        "public" => Some(CodeAccess::Public),
        "private" => Some(CodeAccess::Private),
        "protected" => Some(CodeAccess::Protected),
        "internal" => Some(CodeAccess::Internal),
        _ => None,
    }
}

fn modifier_keyword(word: &str) -> Option<Modifiers> {
    let modifier = match word {
        "static" => Modifiers::STATIC,
        "abstract" => Modifiers::ABSTRACT,
        "virtual" => Modifiers::VIRTUAL,
        "override" => Modifiers::OVERRIDE,
        "sealed" => Modifiers::SEALED,
        "new" => Modifiers::NEW,
        "partial" => Modifiers::PARTIAL,
        "extern" => Modifiers::EXTERNAL,
        "readonly" => Modifiers::READ_ONLY,
        "const" => Modifiers::CONSTANT,
        "volatile" => Modifiers::VOLATILE,
        "unsafe" => Modifiers::UNSAFE,
        "async" => Modifiers::ASYNC,
        _ => return None,
    };
    Some(modifier)
}

fn is_prefix_keyword(word: &str) -> bool {
    access_keyword(word).is_some() || modifier_keyword(word).is_some()
}

/// Strip leading access and modifier keywords off `words`.
fn take_modifiers(words: &mut Vec<String>) -> (CodeAccess, Modifiers) {
    let mut access = CodeAccess::None;
    let mut modifiers = Modifiers::NONE;
    let prefix = words.iter().take_while(|w| is_prefix_keyword(w)).count();
    for word in words.drain(..prefix) {
        if let Some(level) = access_keyword(&word) {
            access = access.combine(level);
        } else if let Some(modifier) = modifier_keyword(&word) {
            modifiers |= modifier;
        }
    }
    (access, modifiers)
}

fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '!' | '~' | '=' | '<' | '>'
    )
}

/// Split `IFoo<T>.Bar` into the interface part and the member name.
fn split_interface(raw: &str) -> (Option<&str>, &str) {
    let mut depth = 0usize;
    let mut cut = None;
    for (offset, c) in raw.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => cut = Some(offset),
            _ => {}
        }
    }
    match cut {
        Some(offset) => (Some(&raw[..offset]), &raw[offset + 1..]),
        None => (None, raw),
    }
}

/// Split `Name<T, U>` into the name and its type parameters.
fn split_generic_name(
    raw: &str,
    at: Position,
) -> Result<(String, Vec<TypeParameter>), SyntaxError> {
    match raw.find('<') {
        Some(open) if raw.ends_with('>') => {
            let parameters = parse_csharp_type_parameters(&raw[open + 1..raw.len() - 1], at)?;
            Ok((raw[..open].to_string(), parameters))
        }
        Some(_) => Err(SyntaxError::builder(ErrorCode::E0304)
            .message("expected '>'")
            .at(at)
            .text(raw)
            .context(ParseContext::TypeParameterList)
            .build()),
        None => Ok((raw.to_string(), Vec::new())),
    }
}

fn missing_name(what: &str, head: &Head) -> SyntaxError {
    SyntaxError::builder(ErrorCode::E0301)
        .message(format!("expected {what} name"))
        .at(head.start)
        .text(head.words.join(" "))
        .context(ParseContext::Declaration)
        .build()
}

fn unexpected_end(expected: &str, head: &Head) -> SyntaxError {
    SyntaxError::builder(ErrorCode::E0201)
        .message(format!("expected '{expected}'"))
        .at(head.start)
        .text(head.end.as_str())
        .context(ParseContext::Declaration)
        .build()
}

impl Parser<'_> {
    pub(super) fn parse_declaration(&mut self, scope: &mut Scope) -> Result<(), SyntaxError> {
        let header_comments = scope.take_header_comments();
        let attributes = scope.take_attributes();
        // Nested declarations drain their own comments above this mark.
        let mark = self.head_comments.len();
        let mut head = self.read_head()?;
        let (access, modifiers) = take_modifiers(&mut head.words);
        let keyword = head.words.first().cloned().unwrap_or_default();
        trace!(keyword = keyword.as_str(), line = head.start.line, "declaration");

        let mut elements = match keyword.as_str() {
            "namespace" => vec![self.parse_namespace(&head)?],
            "using" => vec![self.parse_using(&head)?],
            "alias" if modifiers.contains(Modifiers::EXTERNAL) => {
                self.expect_semicolon()?;
                vec![CodeElement::raw_text(format!(
                    "extern {};",
                    head.words.join(" ")
                ))]
            }
            "class" | "struct" | "interface" | "enum" => vec![self.parse_type(&head)?],
            "delegate" => vec![self.parse_delegate(&head)?],
            "event" => self.parse_events(&head)?,
            _ => self.parse_member(head)?,
        };

        let mut header_comments = Some(header_comments);
        for element in &mut elements {
            if !matches!(element.kind, ElementKind::RawText(_)) {
                element.access = access;
                element.modifiers = modifiers;
            }
            element.attributes = attributes.clone();
            element.header_comments = header_comments.take().unwrap_or_default();
        }
        let head_comments: Vec<CommentElement> = self.head_comments.drain(mark..).collect();
        match elements.first_mut() {
            Some(first) => first.header_comments.extend(head_comments),
            None => elements.extend(head_comments.into_iter().map(CodeElement::comment)),
        }
        let trailing = self.scanner.read_trailing_comment()?;
        if let Some(last) = elements.last_mut() {
            last.trailing_comment = trailing;
        }
        for element in elements {
            scope.push(element);
        }
        Ok(())
    }

    /// Read the words of a declaration head, stopping on its terminator.
    fn read_head(&mut self) -> Result<Head, SyntaxError> {
        let start = self.scanner.position();
        let mut words: Vec<String> = Vec::new();
        let mut index_parameter = None;
        let mut join = false;
        let finish = |words: Vec<String>, index_parameter: Option<String>, end: HeadEnd| {
            Ok(Head {
                words,
                index_parameter,
                end,
                start,
            })
        };
        loop {
            self.skip_trivia()?;
            let at = self.scanner.position();
            let Some(c) = self.scanner.peek() else {
                return Err(SyntaxError::builder(ErrorCode::E0201)
                    .message("expected ';' or '{'")
                    .at(at)
                    .text(words.join(" "))
                    .context(ParseContext::Declaration)
                    .build());
            };
            if words.last().is_some_and(|w| w == "operator") && is_operator_char(c) {
                let mut symbol = String::new();
                while let Some(c) = self.scanner.peek().filter(|c| is_operator_char(*c)) {
                    symbol.push(c);
                    self.scanner.advance();
                }
                words.push(symbol);
                continue;
            }
            match c {
                '(' if words.last().is_none_or(|w| is_prefix_keyword(w)) => {
                    let inner =
                        self.scanner
                            .capture_block('(', ')', ")", ParseContext::Declaration)?;
                    words.push(format!("({inner})"));
                }
                '(' => return finish(words, index_parameter, HeadEnd::Paren),
                '{' => return finish(words, index_parameter, HeadEnd::Brace),
                ';' => return finish(words, index_parameter, HeadEnd::Semicolon),
                ',' => return finish(words, index_parameter, HeadEnd::Comma),
                '=' if self.scanner.peek_at(1) == Some('>') => {
                    return finish(words, index_parameter, HeadEnd::Arrow);
                }
                '=' => return finish(words, index_parameter, HeadEnd::Assign),
                ':' if self.scanner.peek_at(1) == Some(':') => {
                    self.scanner.eat_str("::");
                    match words.last_mut() {
                        Some(last) => last.push_str("::"),
                        None => words.push("::".to_string()),
                    }
                    join = true;
                }
                ':' => return finish(words, index_parameter, HeadEnd::Colon),
                '[' if words
                    .last()
                    .is_some_and(|w| w == "this" || w.ends_with(".this")) =>
                {
                    let inner =
                        self.scanner
                            .capture_block('[', ']', "]", ParseContext::ParameterList)?;
                    index_parameter = Some(inner.trim().to_string());
                }
                '[' | '<' => {
                    let (open, close) = if c == '[' { ('[', ']') } else { ('<', '>') };
                    let closer = close.to_string();
                    let inner = self.scanner.capture_block(
                        open,
                        close,
                        &closer,
                        ParseContext::TypeParameterList,
                    )?;
                    let Some(last) = words.last_mut() else {
                        return Err(format_context_error(
                            &open.to_string(),
                            at,
                            ParseContext::Declaration,
                        ));
                    };
                    last.push(open);
                    last.push_str(&inner);
                    last.push(close);
                }
                '?' | '*' => {
                    self.scanner.advance();
                    if let Some(last) = words.last_mut() {
                        last.push(c);
                    }
                }
                '.' => {
                    self.scanner.advance();
                    match words.last_mut() {
                        Some(last) => last.push('.'),
                        None => {
                            return Err(format_context_error(".", at, ParseContext::Declaration));
                        }
                    }
                    join = true;
                }
                '~' => {
                    self.scanner.advance();
                    words.push("~".to_string());
                    join = true;
                }
                c if is_identifier_start(c) || c == '@' => {
                    if !join && !words.is_empty() && self.scanner.starts_with_word("where", false)
                    {
                        return finish(words, index_parameter, HeadEnd::Where);
                    }
                    let Some(ident) = self.scanner.read_identifier() else {
                        return Err(format_context_error(
                            &c.to_string(),
                            at,
                            ParseContext::Declaration,
                        ));
                    };
                    match words.last_mut().filter(|_| join) {
                        Some(last) => last.push_str(&ident),
                        None => words.push(ident),
                    }
                    join = false;
                }
                _ => {
                    return Err(format_context_error(
                        &c.to_string(),
                        at,
                        ParseContext::Declaration,
                    ));
                }
            }
        }
    }

    fn check_name(&self, name: &str, at: Position) -> Result<(), SyntaxError> {
        if self.keywords.is_reserved(name) {
            return Err(SyntaxError::builder(ErrorCode::E0302)
                .message(format!("'{name}' is a reserved word"))
                .at(at)
                .text(name)
                .context(ParseContext::Declaration)
                .hint(format!("use '@{name}' to declare it as an identifier"))
                .build());
        }
        Ok(())
    }

    fn expect_semicolon(&mut self) -> Result<(), SyntaxError> {
        self.skip_trivia()?;
        self.scanner.expect(';', ParseContext::Declaration)
    }

    /// Consume an optional `;` after a closing brace on the same line.
    fn eat_optional_semicolon(&mut self) {
        self.scanner.skip_inline_whitespace();
        self.scanner.eat(';');
    }

    fn parse_namespace(&mut self, head: &Head) -> Result<CodeElement, SyntaxError> {
        let name = head
            .words
            .get(1)
            .ok_or_else(|| missing_name("namespace", head))?
            .clone();
        let children = match head.end {
            HeadEnd::Brace => {
                self.scanner.advance();
                let children = self.parse_scope(ScopeEnd::Brace, ParseContext::NamespaceBody)?;
                self.eat_optional_semicolon();
                children
            }
            HeadEnd::Semicolon => {
                self.scanner.advance();
                self.parse_scope(ScopeEnd::EndOfInput, ParseContext::NamespaceBody)?
            }
            _ => return Err(unexpected_end("{", head)),
        };
        Ok(CodeElement::namespace(name).with_children(children))
    }

    /// `using N;`, `using static N;` and `using Alias = N;`
    fn parse_using(&mut self, head: &Head) -> Result<CodeElement, SyntaxError> {
        let (name, redefine) = match head.end {
            HeadEnd::Semicolon if head.words.len() > 1 => {
                self.scanner.advance();
                (head.words[1..].join(" "), None)
            }
            HeadEnd::Assign if head.words.len() == 2 => {
                self.scanner.advance();
                let target =
                    self.scanner
                        .capture_until(&[';'], ";", ParseContext::Declaration)?;
                self.scanner.advance();
                (target.trim().to_string(), Some(head.words[1].clone()))
            }
            HeadEnd::Semicolon | HeadEnd::Assign => return Err(missing_name("namespace", head)),
            _ => return Err(unexpected_end(";", head)),
        };
        let is_movable = redefine.is_none();
        Ok(CodeElement::new(
            name,
            ElementKind::Using(UsingElement {
                redefine,
                is_movable,
            }),
        ))
    }

    fn parse_type(&mut self, head: &Head) -> Result<CodeElement, SyntaxError> {
        let type_kind = match head.words[0].as_str() {
            "struct" => TypeElementType::Structure,
            "interface" => TypeElementType::Interface,
            "enum" => TypeElementType::Enum,
            _ => TypeElementType::Class,
        };
        let raw_name = head.words.get(1).ok_or_else(|| missing_name("type", head))?;
        if let Some(extra) = head.words.get(2) {
            return Err(format_context_error(extra, head.start, ParseContext::Declaration));
        }
        let (name, mut type_parameters) = split_generic_name(raw_name, head.start)?;
        self.check_name(&name, head.start)?;

        let rules = LiteralRules::CSHARP;
        let mut interfaces = Vec::new();
        let mut clauses = String::new();
        match head.end {
            HeadEnd::Colon => {
                self.scanner.advance();
                let text = self
                    .scanner
                    .capture_until(&['{', ';'], "{", ParseContext::Declaration)?;
                let split = find_top_level_word(&text, "where", false, rules).unwrap_or(text.len());
                interfaces = split_top_level(&text[..split], ',', rules)
                    .into_iter()
                    .map(|base| InterfaceReference::new(base, InterfaceReferenceType::None))
                    .collect();
                clauses = text[split..].to_string();
            }
            HeadEnd::Where => {
                clauses = self
                    .scanner
                    .capture_until(&['{', ';'], "{", ParseContext::Declaration)?;
            }
            HeadEnd::Brace => {}
            _ => return Err(unexpected_end("{", head)),
        }
        if !clauses.trim().is_empty() {
            apply_where_clauses(&clauses, &mut type_parameters, head.start)?;
        }

        let mut element = CodeElement::type_element(name, type_kind);
        if type_kind == TypeElementType::Enum {
            let body = self
                .scanner
                .capture_block('{', '}', "}", ParseContext::TypeBody)?;
            element.body_text = Some(dedent(&body));
        } else {
            self.scanner.expect('{', ParseContext::Declaration)?;
            element.children = self.parse_scope(ScopeEnd::Brace, ParseContext::TypeBody)?;
        }
        self.eat_optional_semicolon();
        if let ElementKind::Type(ty) = &mut element.kind {
            ty.interfaces = interfaces;
        }
        element.type_parameters = type_parameters;
        Ok(element)
    }

    fn read_parameters(&mut self) -> Result<String, SyntaxError> {
        let text = self
            .scanner
            .capture_block('(', ')', ")", ParseContext::ParameterList)?;
        Ok(text.trim().to_string())
    }

    /// Optional `where` clauses after a method or delegate signature.
    fn read_where_clauses(
        &mut self,
        type_parameters: &mut [TypeParameter],
        at: Position,
    ) -> Result<(), SyntaxError> {
        self.skip_trivia()?;
        if self.scanner.starts_with_word("where", false) {
            let clauses =
                self.scanner
                    .capture_until(&['{', ';', '='], "{", ParseContext::Declaration)?;
            apply_where_clauses(&clauses, type_parameters, at)?;
        }
        Ok(())
    }

    fn parse_delegate(&mut self, head: &Head) -> Result<CodeElement, SyntaxError> {
        if head.end != HeadEnd::Paren {
            return Err(unexpected_end("(", head));
        }
        let count = head.words.len();
        if count < 3 {
            return Err(missing_name("delegate", head));
        }
        let return_type = head.words[1..count - 1].join(" ");
        let (name, mut type_parameters) = split_generic_name(&head.words[count - 1], head.start)?;
        self.check_name(&name, head.start)?;
        let parameters = self.read_parameters()?;
        self.read_where_clauses(&mut type_parameters, head.start)?;
        self.expect_semicolon()?;
        let mut element = CodeElement::new(
            name,
            ElementKind::Delegate(DelegateElement {
                return_type: Some(return_type),
                parameters,
            }),
        );
        element.type_parameters = type_parameters;
        Ok(element)
    }

    /// `event T A, B;`, `event T A = x;` or `event T A { add {} remove {} }`
    fn parse_events(&mut self, head: &Head) -> Result<Vec<CodeElement>, SyntaxError> {
        let count = head.words.len();
        if count < 3 {
            return Err(missing_name("event", head));
        }
        let event_type = head.words[1..count - 1].join(" ");
        let raw_name = &head.words[count - 1];
        let (interface, name) = split_interface(raw_name);
        let implements = interface
            .map(|_| vec![InterfaceReference::new(raw_name, InterfaceReferenceType::Interface)])
            .unwrap_or_default();
        self.check_name(name, head.start)?;
        let event = |name: String, implements: Vec<InterfaceReference>, is_custom: bool| {
            CodeElement::new(
                name,
                ElementKind::Event(EventElement {
                    event_type: Some(event_type.clone()),
                    parameters: None,
                    implements,
                    is_custom,
                }),
            )
        };
        match head.end {
            HeadEnd::Brace => {
                let body = self
                    .scanner
                    .capture_block('{', '}', "}", ParseContext::MemberBody)?;
                let mut element = event(name.to_string(), implements, true);
                element.body_text = Some(dedent(&body));
                Ok(vec![element])
            }
            HeadEnd::Semicolon | HeadEnd::Comma | HeadEnd::Assign => {
                let declarators = self.read_declarators(name.to_string())?;
                Ok(declarators
                    .into_iter()
                    .map(|declarator| {
                        let mut element = event(declarator.name, Vec::new(), false);
                        element.body_text = declarator.initial_value;
                        element
                    })
                    .collect())
            }
            _ => Err(unexpected_end(";", head)),
        }
    }

    /// Read `[= value] {, name [= value]} ;` starting after the first name.
    fn read_declarators(&mut self, first: String) -> Result<Vec<Declarator>, SyntaxError> {
        let mut declarators = Vec::new();
        let mut name = first;
        loop {
            self.skip_trivia()?;
            let mut initial_value = None;
            if self.scanner.eat('=') {
                let value =
                    self.scanner
                        .capture_until(&[',', ';'], ";", ParseContext::Declaration)?;
                initial_value = Some(value.trim().to_string());
            }
            declarators.push(Declarator {
                name,
                initial_value,
            });
            self.skip_trivia()?;
            let at = self.scanner.position();
            match self.scanner.peek() {
                Some(',') => {
                    self.scanner.advance();
                    self.skip_trivia()?;
                    let at = self.scanner.position();
                    name = self.scanner.read_identifier().ok_or_else(|| {
                        SyntaxError::builder(ErrorCode::E0301)
                            .message("expected name after ','")
                            .at(at)
                            .context(ParseContext::Declaration)
                            .build()
                    })?;
                    self.check_name(&name, at)?;
                }
                Some(';') => {
                    self.scanner.advance();
                    return Ok(declarators);
                }
                Some(c) => {
                    return Err(SyntaxError::builder(ErrorCode::E0201)
                        .message("expected ';'")
                        .at(at)
                        .text(c.to_string())
                        .context(ParseContext::Declaration)
                        .build());
                }
                None => return Err(SyntaxError::expected_closer(";", at, ParseContext::Declaration)),
            }
        }
    }

    fn parse_member(&mut self, head: Head) -> Result<Vec<CodeElement>, SyntaxError> {
        if head.words.is_empty() {
            return Err(SyntaxError::builder(ErrorCode::E0303)
                .message("unrecognized construct")
                .at(head.start)
                .text(head.end.as_str())
                .context(ParseContext::Declaration)
                .build());
        }
        if head.index_parameter.is_some() {
            return self.parse_property(head).map(|element| vec![element]);
        }
        match head.end {
            HeadEnd::Paren => self.parse_method(head).map(|element| vec![element]),
            HeadEnd::Brace | HeadEnd::Arrow => self.parse_property(head).map(|element| vec![element]),
            HeadEnd::Semicolon | HeadEnd::Comma | HeadEnd::Assign => self.parse_fields(head),
            HeadEnd::Colon | HeadEnd::Where => Err(format_context_error(
                head.end.as_str(),
                self.scanner.position(),
                ParseContext::Declaration,
            )),
        }
    }

    /// Body of a method-like member: `{...}`, `;` or `=> expression;`.
    fn read_member_body(&mut self) -> Result<Option<String>, SyntaxError> {
        self.skip_trivia()?;
        let at = self.scanner.position();
        match self.scanner.peek() {
            Some('{') => {
                let body = self
                    .scanner
                    .capture_block('{', '}', "}", ParseContext::MemberBody)?;
                Ok(Some(dedent(&body)))
            }
            Some(';') => {
                self.scanner.advance();
                Ok(None)
            }
            Some('=') if self.scanner.peek_at(1) == Some('>') => {
                self.scanner.eat_str("=>");
                let expression =
                    self.scanner
                        .capture_until(&[';'], ";", ParseContext::MemberBody)?;
                self.scanner.advance();
                Ok(Some(format!("=> {}", expression.trim())))
            }
            found => Err(SyntaxError::builder(ErrorCode::E0201)
                .message("expected '{' or ';'")
                .at(at)
                .text(found.map(String::from).unwrap_or_default())
                .context(ParseContext::Declaration)
                .build()),
        }
    }

    fn parse_method(&mut self, head: Head) -> Result<CodeElement, SyntaxError> {
        let words = &head.words;
        let count = words.len();

        if count == 1 && !words[0].starts_with('~') {
            let name = words[0].clone();
            self.check_name(&name, head.start)?;
            let parameters = self.read_parameters()?;
            let mut constructor = ConstructorElement::new(parameters);
            self.skip_trivia()?;
            if self.scanner.eat(':') {
                self.skip_trivia()?;
                let at = self.scanner.position();
                let target = self
                    .scanner
                    .read_identifier()
                    .filter(|target| target == "base" || target == "this")
                    .ok_or_else(|| {
                        SyntaxError::builder(ErrorCode::E0201)
                            .message("expected 'base' or 'this'")
                            .at(at)
                            .context(ParseContext::Declaration)
                            .build()
                    })?;
                self.skip_trivia()?;
                let arguments =
                    self.scanner
                        .capture_block('(', ')', ")", ParseContext::ParameterList)?;
                constructor.reference = Some(format!("{target}({})", arguments.trim()));
            }
            let mut element = CodeElement::new(name, ElementKind::Constructor(constructor));
            element.body_text = self.read_member_body()?;
            return Ok(element);
        }

        let mut method = MethodElement::default();
        let name;
        let mut type_parameters = Vec::new();
        if let Some(index) = words.iter().position(|w| w == "operator") {
            method.is_operator = true;
            let conversion = index
                .checked_sub(1)
                .and_then(|i| match words[i].as_str() {
                    "implicit" => Some(OperatorType::Implicit),
                    "explicit" => Some(OperatorType::Explicit),
                    _ => None,
                });
            let operand = words.get(index + 1).ok_or_else(|| {
                SyntaxError::builder(ErrorCode::E0301)
                    .message("expected operator")
                    .at(head.start)
                    .text(words.join(" "))
                    .context(ParseContext::Declaration)
                    .build()
            })?;
            match conversion {
                Some(operator_type) => {
                    method.operator_type = operator_type;
                    method.return_type = Some(operand.clone());
                }
                None => method.return_type = Some(words[..index].join(" ")),
            }
            name = operand.clone();
        } else if count == 1 {
            // finalizer
            name = words[0].clone();
        } else {
            method.return_type = Some(words[..count - 1].join(" "));
            let raw_name = &words[count - 1];
            let (interface, member) = split_interface(raw_name);
            let (member, parameters) = split_generic_name(member, head.start)?;
            self.check_name(&member, head.start)?;
            if interface.is_some() {
                method
                    .implements
                    .push(InterfaceReference::new(raw_name, InterfaceReferenceType::Interface));
            }
            name = member;
            type_parameters = parameters;
        }
        method.parameters = self.read_parameters()?;
        self.read_where_clauses(&mut type_parameters, head.start)?;
        let mut element = CodeElement::new(name, ElementKind::Method(method));
        element.type_parameters = type_parameters;
        element.body_text = self.read_member_body()?;
        Ok(element)
    }

    fn parse_property(&mut self, head: Head) -> Result<CodeElement, SyntaxError> {
        let count = head.words.len();
        if count < 2 {
            return Err(missing_name("property", &head));
        }
        let raw_name = &head.words[count - 1];
        let (interface, name) = split_interface(raw_name);
        let mut property = PropertyElement::new(head.words[..count - 1].join(" "));
        property.is_indexer = head.index_parameter.is_some();
        property.index_parameter = head.index_parameter.clone();
        if interface.is_some() {
            property
                .implements
                .push(InterfaceReference::new(raw_name, InterfaceReferenceType::Interface));
        }
        if !property.is_indexer {
            self.check_name(name, head.start)?;
        }
        let name = name.to_string();

        self.skip_trivia()?;
        let body = match self.scanner.peek() {
            Some('{') => {
                let body = self
                    .scanner
                    .capture_block('{', '}', "}", ParseContext::MemberBody)?;
                self.scanner.skip_inline_whitespace();
                if self.scanner.peek() == Some('=') {
                    self.scanner.advance();
                    let value =
                        self.scanner
                            .capture_until(&[';'], ";", ParseContext::Declaration)?;
                    self.scanner.advance();
                    property.initial_value = Some(value.trim().to_string());
                }
                Some(dedent(&body))
            }
            _ => self.read_member_body()?,
        };
        let mut element = CodeElement::new(name, ElementKind::Property(property));
        element.body_text = body;
        Ok(element)
    }

    fn parse_fields(&mut self, head: Head) -> Result<Vec<CodeElement>, SyntaxError> {
        let count = head.words.len();
        if count < 2 {
            return Err(SyntaxError::builder(ErrorCode::E0303)
                .message("unrecognized construct")
                .at(head.start)
                .text(head.words.join(" "))
                .context(ParseContext::Declaration)
                .build());
        }
        let field_type = head.words[..count - 1].join(" ");
        let first = head.words[count - 1].clone();
        self.check_name(&first, head.start)?;
        let declarators = self.read_declarators(first)?;
        Ok(declarators
            .into_iter()
            .map(|declarator| {
                let mut field = FieldElement::new(field_type.clone());
                field.initial_value = declarator.initial_value;
                CodeElement::new(declarator.name, ElementKind::Field(field))
            })
            .collect())
    }
}
