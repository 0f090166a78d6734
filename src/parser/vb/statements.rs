//! Visual Basic declaration statements.
//!
//! A statement is an optional run of prefix words (access, modifiers, `Dim`,
//! `Default`, `WithEvents`, ...) followed by a keyword that names the
//! construct. Statements without a construct keyword but with at least one
//! prefix word declare fields.

use tracing::trace;

use super::{Block, Parser, RULES};
use crate::base::Position;
use crate::elements::{
    CodeAccess, CodeElement, CommentElement, ConstructorElement, DelegateElement, ElementKind,
    EventElement, ExternalMethod, FieldElement, InterfaceReference, InterfaceReferenceType,
    MethodElement, Modifiers, OperatorType, PropertyElement, TypeElementType, TypeParameter,
    UsingElement,
};
use crate::parser::errors::{ErrorCode, ParseContext, SyntaxError};
use crate::parser::scanner::Scanner;
use crate::parser::scope::Scope;
use crate::parser::text::{
    find_top_level_char, find_top_level_word, parse_vb_type_parameters, split_top_level,
};

#[derive(Debug, Clone, Copy)]
enum PrefixWord {
    Access(CodeAccess),
    Modifier(Modifiers),
    Dim,
    Default,
    WithEvents,
    Widening,
    Narrowing,
    /// Accepted and not recorded (`Overloads`, `WriteOnly`, ...)
    Ignored,
}

const PREFIX_WORDS: &[(&str, PrefixWord)] = &[
    ("Public", PrefixWord::Access(CodeAccess::Public)),
    ("Private", PrefixWord::Access(CodeAccess::Private)),
    ("Protected", PrefixWord::Access(CodeAccess::Protected)),
    ("Friend", PrefixWord::Access(CodeAccess::Internal)),
    ("Shared", PrefixWord::Modifier(Modifiers::STATIC)),
    ("MustInherit", PrefixWord::Modifier(Modifiers::ABSTRACT)),
    ("MustOverride", PrefixWord::Modifier(Modifiers::ABSTRACT)),
    ("Overridable", PrefixWord::Modifier(Modifiers::VIRTUAL)),
    ("Overrides", PrefixWord::Modifier(Modifiers::OVERRIDE)),
    ("NotInheritable", PrefixWord::Modifier(Modifiers::SEALED)),
    ("NotOverridable", PrefixWord::Modifier(Modifiers::SEALED)),
    ("Shadows", PrefixWord::Modifier(Modifiers::NEW)),
    ("Partial", PrefixWord::Modifier(Modifiers::PARTIAL)),
    ("ReadOnly", PrefixWord::Modifier(Modifiers::READ_ONLY)),
    ("Const", PrefixWord::Modifier(Modifiers::CONSTANT)),
    ("Async", PrefixWord::Modifier(Modifiers::ASYNC)),
    ("Dim", PrefixWord::Dim),
    ("Default", PrefixWord::Default),
    ("WithEvents", PrefixWord::WithEvents),
    ("Widening", PrefixWord::Widening),
    ("Narrowing", PrefixWord::Narrowing),
    ("Overloads", PrefixWord::Ignored),
    ("WriteOnly", PrefixWord::Ignored),
    ("Iterator", PrefixWord::Ignored),
    ("Static", PrefixWord::Ignored),
];

/// What the prefix words of a statement declared.
#[derive(Debug, Default)]
struct Prefix {
    access: CodeAccess,
    modifiers: Modifiers,
    dim: bool,
    default: bool,
    with_events: bool,
    operator_type: OperatorType,
    /// At least one prefix word was written
    any: bool,
}

/// Consume `word` (case-insensitively) and the spaces after it.
fn eat_word(cursor: &mut Scanner, word: &str) -> bool {
    if !cursor.starts_with_word(word, true) {
        return false;
    }
    for _ in word.chars() {
        cursor.advance();
    }
    cursor.skip_inline_whitespace();
    true
}

fn read_prefix(cursor: &mut Scanner) -> Prefix {
    let mut prefix = Prefix::default();
    'words: loop {
        cursor.skip_inline_whitespace();
        for (word, kind) in PREFIX_WORDS {
            if !eat_word(cursor, word) {
                continue;
            }
            prefix.any = true;
            match *kind {
                PrefixWord::Access(level) => prefix.access = prefix.access.combine(level),
                PrefixWord::Modifier(modifier) => prefix.modifiers |= modifier,
                PrefixWord::Dim => prefix.dim = true,
                PrefixWord::Default => prefix.default = true,
                PrefixWord::WithEvents => prefix.with_events = true,
                PrefixWord::Widening => prefix.operator_type = OperatorType::Implicit,
                PrefixWord::Narrowing => prefix.operator_type = OperatorType::Explicit,
                PrefixWord::Ignored => {}
            }
            continue 'words;
        }
        return prefix;
    }
}

/// A declared name: an identifier or an escaped `[Name]`.
fn read_name(cursor: &mut Scanner) -> Option<String> {
    if cursor.peek() != Some('[') {
        let name = cursor.read_identifier();
        cursor.skip_inline_whitespace();
        return name;
    }
    let mut name = String::new();
    while let Some(c) = cursor.advance() {
        name.push(c);
        if c == ']' {
            cursor.skip_inline_whitespace();
            return Some(name);
        }
    }
    None
}

/// The clauses after a signature: `As T`, `= value`, `Handles a, b` and
/// `Implements I.M, J.N`, in any order after the type.
#[derive(Debug, Default)]
struct Tail {
    as_type: Option<String>,
    initial_value: Option<String>,
    handles: Vec<String>,
    implements: Vec<InterfaceReference>,
}

fn parse_tail(text: &str) -> Tail {
    let mut tail = Tail::default();
    let mut cuts: Vec<(usize, &str)> = ["Handles", "Implements"]
        .into_iter()
        .filter_map(|word| find_top_level_word(text, word, true, RULES).map(|at| (at, word)))
        .collect();
    cuts.sort_unstable();
    let head_end = cuts.first().map_or(text.len(), |(at, _)| *at);
    for (index, (at, word)) in cuts.iter().enumerate() {
        let end = cuts.get(index + 1).map_or(text.len(), |(next, _)| *next);
        let list = split_top_level(&text[at + word.len()..end], ',', RULES);
        if *word == "Handles" {
            tail.handles = list;
        } else {
            tail.implements = list
                .into_iter()
                .map(|name| InterfaceReference::new(name, InterfaceReferenceType::Interface))
                .collect();
        }
    }

    let mut head = text[..head_end].trim();
    if let Some(eq) = find_top_level_char(head, '=', RULES) {
        tail.initial_value = Some(head[eq + 1..].trim().to_string());
        head = head[..eq].trim();
    }
    let mut words = Scanner::new(head, RULES);
    if eat_word(&mut words, "As") {
        let as_type = words.read_rest_of_line();
        tail.as_type = Some(as_type.trim().to_string()).filter(|t| !t.is_empty());
    }
    tail
}

/// Split `New T(args)` into the type `T` and the constructor expression.
fn split_new(as_type: &str) -> (String, Option<String>) {
    let Some(rest) = as_type
        .get(..4)
        .filter(|new| new.eq_ignore_ascii_case("New "))
        .map(|_| as_type[4..].trim())
    else {
        return (as_type.to_string(), None);
    };
    let mut type_name = rest;
    if rest.ends_with(')') {
        if let Some(open) = rest.rfind('(') {
            let args = rest[open + 1..].trim_start();
            let is_type_list = args.get(..3).is_some_and(|of| of.eq_ignore_ascii_case("Of "));
            if !is_type_list {
                type_name = rest[..open].trim_end();
            }
        }
    }
    (type_name.to_string(), Some(as_type.to_string()))
}

/// One `name[()] [As T] [= value]` piece of a field statement.
struct Declarator {
    name: String,
    /// Array bounds written after the name, e.g. `()`
    bounds: String,
    as_type: Option<String>,
    initial_value: Option<String>,
}

fn parse_declarator(piece: &str) -> Declarator {
    let (declaration, initial_value) = match find_top_level_char(piece, '=', RULES) {
        Some(eq) => (&piece[..eq], Some(piece[eq + 1..].trim().to_string())),
        None => (piece, None),
    };
    let (name_part, as_type) = match find_top_level_word(declaration, "As", true, RULES) {
        Some(at) => (
            declaration[..at].trim(),
            Some(declaration[at + 2..].trim().to_string()),
        ),
        None => (declaration.trim(), None),
    };
    let (name, bounds) = match name_part.find('(') {
        Some(open) if !name_part.starts_with('[') => {
            (name_part[..open].trim(), name_part[open..].trim())
        }
        _ => (name_part, ""),
    };
    Declarator {
        name: name.to_string(),
        bounds: bounds.to_string(),
        as_type,
        initial_value,
    }
}

impl Parser<'_> {
    pub(super) fn parse_statement(
        &mut self,
        scope: &mut Scope,
        block: Block,
        cursor: &mut Scanner,
        trailing: Option<CommentElement>,
    ) -> Result<(), SyntaxError> {
        let header_comments = scope.take_header_comments();
        let attributes = scope.take_attributes();
        let at = cursor.position();
        let prefix = read_prefix(cursor);

        let mut elements = if eat_word(cursor, "Namespace") {
            vec![self.parse_namespace(cursor, at)?]
        } else if eat_word(cursor, "Imports") {
            parse_imports(cursor, at)?
        } else if cursor.starts_with_word("Option", true) {
            vec![CodeElement::raw_text(cursor.read_rest_of_line().trim())]
        } else if let Some((keyword, kind)) = type_keyword(cursor) {
            vec![self.parse_type(cursor, keyword, kind, at)?]
        } else if eat_word(cursor, "Sub") {
            vec![self.parse_method(cursor, false, &prefix, block, at)?]
        } else if eat_word(cursor, "Function") {
            vec![self.parse_method(cursor, true, &prefix, block, at)?]
        } else if eat_word(cursor, "Declare") {
            vec![self.parse_declare(cursor, at)?]
        } else if eat_word(cursor, "Property") {
            vec![self.parse_property(cursor, &prefix, block, at)?]
        } else if eat_word(cursor, "Custom") {
            if !eat_word(cursor, "Event") {
                return Err(self.unrecognized(cursor, at));
            }
            vec![self.parse_event(cursor, true, at)?]
        } else if eat_word(cursor, "Event") {
            vec![self.parse_event(cursor, false, at)?]
        } else if eat_word(cursor, "Delegate") {
            vec![self.parse_delegate(cursor, at)?]
        } else if eat_word(cursor, "Operator") {
            vec![self.parse_operator(cursor, &prefix, at)?]
        } else if prefix.any {
            self.parse_fields(cursor, &prefix, at)?
        } else {
            return Err(self.unrecognized(cursor, at));
        };

        let mut header_comments = Some(header_comments);
        for element in &mut elements {
            if !matches!(element.kind, ElementKind::RawText(_)) {
                element.access = prefix.access;
                element.modifiers |= prefix.modifiers;
            }
            element.attributes = attributes.clone();
            element.header_comments = header_comments.take().unwrap_or_default();
        }
        if let Some(last) = elements.last_mut() {
            // A block's `End` line comment already trails it; the header
            // line's comment then joins the header comments.
            match trailing {
                Some(comment) if last.trailing_comment.is_some() => {
                    last.header_comments.push(comment)
                }
                Some(comment) => last.trailing_comment = Some(comment),
                None => {}
            }
        }
        for element in elements {
            scope.push(element);
        }
        Ok(())
    }

    fn unrecognized(&self, cursor: &mut Scanner, at: Position) -> SyntaxError {
        SyntaxError::builder(ErrorCode::E0303)
            .message("unrecognized construct")
            .at(at)
            .text(cursor.read_rest_of_line().trim())
            .context(ParseContext::Declaration)
            .build()
    }

    fn check_name(&self, name: &str, at: Position) -> Result<(), SyntaxError> {
        if !name.starts_with('[') && self.keywords.is_reserved(name) {
            return Err(SyntaxError::builder(ErrorCode::E0302)
                .message(format!("'{name}' is a reserved word"))
                .at(at)
                .text(name)
                .context(ParseContext::Declaration)
                .hint(format!("use '[{name}]' to declare it as an identifier"))
                .build());
        }
        Ok(())
    }

    fn expect_name(
        &self,
        cursor: &mut Scanner,
        what: &str,
        at: Position,
    ) -> Result<String, SyntaxError> {
        let name_at = cursor.position();
        let name = read_name(cursor).ok_or_else(|| {
            SyntaxError::builder(ErrorCode::E0301)
                .message(format!("expected {what} name"))
                .at(name_at)
                .text(cursor.peek().map(String::from).unwrap_or_default())
                .context(ParseContext::Declaration)
                .related("declaration starts here", at)
                .build()
        })?;
        self.check_name(&name, name_at)?;
        Ok(name)
    }

    /// `(Of T, U)` and `(parameters)` groups after a name.
    fn read_signature(
        &mut self,
        cursor: &mut Scanner,
    ) -> Result<(Vec<TypeParameter>, Option<String>), SyntaxError> {
        let mut type_parameters = Vec::new();
        let mut parameters = None;
        while cursor.peek() == Some('(') && parameters.is_none() {
            let at = cursor.position();
            let inner = cursor.capture_block('(', ')', ")", ParseContext::ParameterList)?;
            let is_type_list = Scanner::new(inner.trim_start(), RULES).starts_with_word("Of", true);
            if is_type_list && type_parameters.is_empty() {
                type_parameters = parse_vb_type_parameters(&inner, at)?;
            } else {
                parameters = Some(inner.trim().to_string());
            }
            cursor.skip_inline_whitespace();
        }
        Ok((type_parameters, parameters))
    }

    fn parse_namespace(
        &mut self,
        cursor: &mut Scanner,
        at: Position,
    ) -> Result<CodeElement, SyntaxError> {
        let name = cursor.read_rest_of_line().trim().to_string();
        if name.is_empty() {
            return Err(SyntaxError::builder(ErrorCode::E0301)
                .message("expected namespace name")
                .at(at)
                .context(ParseContext::Declaration)
                .build());
        }
        let block = Block {
            end: Some("Namespace"),
            context: ParseContext::NamespaceBody,
            interface: false,
        };
        let (children, closing) = self.parse_block(block, None)?;
        let mut element = CodeElement::namespace(name).with_children(children);
        element.trailing_comment = closing;
        Ok(element)
    }

    fn parse_type(
        &mut self,
        cursor: &mut Scanner,
        keyword: &'static str,
        kind: TypeElementType,
        at: Position,
    ) -> Result<CodeElement, SyntaxError> {
        let name = self.expect_name(cursor, "type", at)?;
        let (type_parameters, parameters) = self.read_signature(cursor)?;
        if let Some(parameters) = parameters {
            return Err(SyntaxError::builder(ErrorCode::E0304)
                .message("expected 'Of'")
                .at(at)
                .text(parameters)
                .context(ParseContext::TypeParameterList)
                .build());
        }
        trace!(kind = keyword, name = %name, line = at.line, "type");
        let mut element = CodeElement::type_element(name, kind);
        element.type_parameters = type_parameters;
        let mut interfaces = Vec::new();
        if kind == TypeElementType::Enum {
            if eat_word(cursor, "As") {
                let underlying = cursor.read_rest_of_line();
                interfaces.push(InterfaceReference::new(
                    underlying.trim(),
                    InterfaceReferenceType::None,
                ));
            }
            self.set_body(&mut element, "Enum", at)?;
        } else {
            let block = Block {
                end: Some(keyword),
                context: ParseContext::TypeBody,
                interface: kind == TypeElementType::Interface,
            };
            let (children, closing) = self.parse_block(block, Some(&mut interfaces))?;
            element.children = children;
            element.trailing_comment = closing;
        }
        if let ElementKind::Type(ty) = &mut element.kind {
            ty.interfaces = interfaces;
        }
        Ok(element)
    }

    fn set_body(
        &mut self,
        element: &mut CodeElement,
        keyword: &'static str,
        at: Position,
    ) -> Result<(), SyntaxError> {
        let (body, closing) = self.capture_body(keyword, at)?;
        element.body_text = Some(body);
        element.trailing_comment = closing;
        Ok(())
    }

    /// Whether a member declared with `prefix` inside `block` has a body.
    fn has_body(prefix: &Prefix, block: Block) -> bool {
        !block.interface && !prefix.modifiers.contains(Modifiers::ABSTRACT)
    }

    fn parse_method(
        &mut self,
        cursor: &mut Scanner,
        is_function: bool,
        prefix: &Prefix,
        block: Block,
        at: Position,
    ) -> Result<CodeElement, SyntaxError> {
        let keyword = if is_function { "Function" } else { "Sub" };
        if !is_function && eat_word(cursor, "New") {
            let (_, parameters) = self.read_signature(cursor)?;
            let constructor = ConstructorElement::new(parameters.unwrap_or_default());
            let mut element = CodeElement::new("New", ElementKind::Constructor(constructor));
            if Self::has_body(prefix, block) {
                self.set_body(&mut element, keyword, at)?;
            }
            return Ok(element);
        }

        let name = self.expect_name(cursor, "method", at)?;
        let (type_parameters, parameters) = self.read_signature(cursor)?;
        let tail = parse_tail(&cursor.read_rest_of_line());
        let mut method = MethodElement::new(
            tail.as_type.filter(|_| is_function),
            parameters.unwrap_or_default(),
        );
        method.handles = tail.handles;
        method.implements = tail.implements;

        let mut element = CodeElement::new(name, ElementKind::Method(method));
        element.type_parameters = type_parameters;
        if Self::has_body(prefix, block) {
            self.set_body(&mut element, keyword, at)?;
        }
        Ok(element)
    }

    /// `Declare [Ansi|Unicode|Auto] Sub|Function Name Lib "x" [Alias "y"] (...) [As T]`
    fn parse_declare(
        &mut self,
        cursor: &mut Scanner,
        at: Position,
    ) -> Result<CodeElement, SyntaxError> {
        let mut external = ExternalMethod::default();
        for charset in ["Ansi", "Unicode", "Auto"] {
            if eat_word(cursor, charset) {
                external.charset = Some(charset.to_string());
            }
        }
        let is_function = if eat_word(cursor, "Function") {
            true
        } else if eat_word(cursor, "Sub") {
            false
        } else {
            return Err(SyntaxError::builder(ErrorCode::E0201)
                .message("expected 'Sub' or 'Function'")
                .at(cursor.position())
                .text(cursor.read_rest_of_line().trim())
                .context(ParseContext::Declaration)
                .build());
        };
        let name = self.expect_name(cursor, "method", at)?;
        if !eat_word(cursor, "Lib") {
            return Err(SyntaxError::builder(ErrorCode::E0201)
                .message("expected 'Lib'")
                .at(cursor.position())
                .text(cursor.read_rest_of_line().trim())
                .context(ParseContext::Declaration)
                .build());
        }
        external.library = Some(read_quoted(cursor)?);
        if eat_word(cursor, "Alias") {
            external.alias = Some(read_quoted(cursor)?);
        }
        let (_, parameters) = self.read_signature(cursor)?;
        let tail = parse_tail(&cursor.read_rest_of_line());
        let mut method = MethodElement::new(
            tail.as_type.filter(|_| is_function),
            parameters.unwrap_or_default(),
        );
        method.external = Some(external);
        let mut element = CodeElement::new(name, ElementKind::Method(method));
        element.modifiers.insert(Modifiers::EXTERNAL);
        Ok(element)
    }

    fn parse_property(
        &mut self,
        cursor: &mut Scanner,
        prefix: &Prefix,
        block: Block,
        at: Position,
    ) -> Result<CodeElement, SyntaxError> {
        let name = self.expect_name(cursor, "property", at)?;
        let (_, parameters) = self.read_signature(cursor)?;
        let tail = parse_tail(&cursor.read_rest_of_line());
        let (property_type, new_value) = split_new(tail.as_type.as_deref().unwrap_or(""));

        let mut property = PropertyElement::new(property_type);
        property.index_parameter = parameters.filter(|p| !p.is_empty());
        property.implements = tail.implements;
        property.is_default = prefix.default;
        property.initial_value = tail.initial_value.or(new_value);

        let mut element = CodeElement::new(name, ElementKind::Property(property));
        if Self::has_body(prefix, block) && self.next_is_accessor() {
            self.set_body(&mut element, "Property", at)?;
        }
        Ok(element)
    }

    /// Whether the next code line starts a `Get` or `Set` accessor.
    fn next_is_accessor(&mut self) -> bool {
        let Some(code) = self.peek_code() else {
            return false;
        };
        let mut cursor = Scanner::new(&code, RULES);
        read_prefix(&mut cursor);
        cursor.starts_with_word("Get", true) || cursor.starts_with_word("Set", true)
    }

    fn parse_event(
        &mut self,
        cursor: &mut Scanner,
        is_custom: bool,
        at: Position,
    ) -> Result<CodeElement, SyntaxError> {
        let name = self.expect_name(cursor, "event", at)?;
        let (_, parameters) = self.read_signature(cursor)?;
        let tail = parse_tail(&cursor.read_rest_of_line());
        let event = EventElement {
            event_type: tail.as_type,
            parameters,
            implements: tail.implements,
            is_custom,
        };
        let mut element = CodeElement::new(name, ElementKind::Event(event));
        if is_custom {
            self.set_body(&mut element, "Event", at)?;
        }
        Ok(element)
    }

    fn parse_delegate(
        &mut self,
        cursor: &mut Scanner,
        at: Position,
    ) -> Result<CodeElement, SyntaxError> {
        let is_function = if eat_word(cursor, "Function") {
            true
        } else if eat_word(cursor, "Sub") {
            false
        } else {
            return Err(SyntaxError::builder(ErrorCode::E0201)
                .message("expected 'Sub' or 'Function'")
                .at(cursor.position())
                .context(ParseContext::Declaration)
                .build());
        };
        let name = self.expect_name(cursor, "delegate", at)?;
        let (type_parameters, parameters) = self.read_signature(cursor)?;
        let tail = parse_tail(&cursor.read_rest_of_line());
        let delegate = DelegateElement {
            return_type: tail.as_type.filter(|_| is_function),
            parameters: parameters.unwrap_or_default(),
        };
        let mut element = CodeElement::new(name, ElementKind::Delegate(delegate));
        element.type_parameters = type_parameters;
        Ok(element)
    }

    fn parse_operator(
        &mut self,
        cursor: &mut Scanner,
        prefix: &Prefix,
        at: Position,
    ) -> Result<CodeElement, SyntaxError> {
        let symbol = match cursor.read_identifier() {
            Some(word) => word,
            None => {
                let mut symbol = String::new();
                while let Some(c) = cursor
                    .peek()
                    .filter(|c| matches!(c, '+' | '-' | '*' | '/' | '\\' | '^' | '&' | '=' | '<' | '>'))
                {
                    symbol.push(c);
                    cursor.advance();
                }
                symbol
            }
        };
        if symbol.is_empty() {
            return Err(SyntaxError::builder(ErrorCode::E0301)
                .message("expected operator")
                .at(cursor.position())
                .context(ParseContext::Declaration)
                .build());
        }
        cursor.skip_inline_whitespace();
        let (_, parameters) = self.read_signature(cursor)?;
        let tail = parse_tail(&cursor.read_rest_of_line());
        let mut method = MethodElement::new(tail.as_type, parameters.unwrap_or_default());
        method.is_operator = true;
        method.operator_type = prefix.operator_type;
        let name = match (prefix.operator_type, &method.return_type) {
            (OperatorType::Implicit | OperatorType::Explicit, Some(target)) => target.clone(),
            _ => symbol,
        };
        let mut element = CodeElement::new(name, ElementKind::Method(method));
        self.set_body(&mut element, "Operator", at)?;
        Ok(element)
    }

    /// `Dim a, b As Integer, c As String = "x"`: each `As T` types the names
    /// collected since the previous typed declarator.
    fn parse_fields(
        &mut self,
        cursor: &mut Scanner,
        prefix: &Prefix,
        at: Position,
    ) -> Result<Vec<CodeElement>, SyntaxError> {
        let text = cursor.read_rest_of_line();
        let declarators: Vec<Declarator> = split_top_level(&text, ',', RULES)
            .iter()
            .map(|piece| parse_declarator(piece))
            .collect();
        if declarators.is_empty() {
            return Err(SyntaxError::builder(ErrorCode::E0301)
                .message("expected field name")
                .at(at)
                .context(ParseContext::Declaration)
                .build());
        }
        let mut fields = Vec::with_capacity(declarators.len());
        let mut untyped: Vec<Declarator> = Vec::new();
        for declarator in declarators {
            if declarator.name.is_empty() {
                return Err(SyntaxError::builder(ErrorCode::E0301)
                    .message("expected field name")
                    .at(at)
                    .text(text.trim())
                    .context(ParseContext::Declaration)
                    .build());
            }
            self.check_name(&declarator.name, at)?;
            match declarator.as_type.clone() {
                Some(as_type) => {
                    // `Dim a, b As New T()` gives each name its own instance.
                    let (field_type, new_value) = split_new(&as_type);
                    for pending in untyped.drain(..).chain(std::iter::once(declarator)) {
                        fields.push(build_field(pending, &field_type, new_value.clone(), prefix));
                    }
                }
                None => untyped.push(declarator),
            }
        }
        for pending in untyped {
            fields.push(build_field(pending, "", None, prefix));
        }
        Ok(fields)
    }
}

fn build_field(
    declarator: Declarator,
    field_type: &str,
    new_value: Option<String>,
    prefix: &Prefix,
) -> CodeElement {
    let mut field = FieldElement::new(format!("{field_type}{}", declarator.bounds));
    field.initial_value = declarator.initial_value.or(new_value);
    field.declared_with_dim = prefix.dim;
    field.with_events = prefix.with_events;
    CodeElement::new(declarator.name, ElementKind::Field(field))
}

fn read_quoted(cursor: &mut Scanner) -> Result<String, SyntaxError> {
    if !cursor.at_string_start() {
        return Err(SyntaxError::builder(ErrorCode::E0201)
            .message("expected string literal")
            .at(cursor.position())
            .text(cursor.peek().map(String::from).unwrap_or_default())
            .context(ParseContext::Declaration)
            .build());
    }
    let mut text = String::new();
    cursor.read_string(&mut text)?;
    cursor.skip_inline_whitespace();
    Ok(super::unquote(&text))
}

/// `Class`, `Structure`, `Interface`, `Module` or `Enum` at the cursor.
fn type_keyword(cursor: &mut Scanner) -> Option<(&'static str, TypeElementType)> {
    const TYPES: [(&str, TypeElementType); 5] = [
        ("Class", TypeElementType::Class),
        ("Structure", TypeElementType::Structure),
        ("Interface", TypeElementType::Interface),
        ("Module", TypeElementType::Module),
        ("Enum", TypeElementType::Enum),
    ];
    TYPES
        .into_iter()
        .find(|(keyword, _)| eat_word(cursor, keyword))
}

/// `Imports A, B = C.D`: one using element per clause.
fn parse_imports(cursor: &mut Scanner, at: Position) -> Result<Vec<CodeElement>, SyntaxError> {
    let text = cursor.read_rest_of_line();
    let clauses = split_top_level(&text, ',', RULES);
    if clauses.is_empty() {
        return Err(SyntaxError::builder(ErrorCode::E0301)
            .message("expected namespace name")
            .at(at)
            .context(ParseContext::Declaration)
            .build());
    }
    Ok(clauses
        .into_iter()
        .map(|clause| {
            let (name, redefine) = match find_top_level_char(&clause, '=', RULES) {
                Some(eq) => (
                    clause[eq + 1..].trim().to_string(),
                    Some(clause[..eq].trim().to_string()),
                ),
                None => (clause, None),
            };
            let is_movable = redefine.is_none();
            CodeElement::new(
                name,
                ElementKind::Using(UsingElement {
                    redefine,
                    is_movable,
                }),
            )
        })
        .collect())
}
