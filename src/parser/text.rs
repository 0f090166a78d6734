//! Helpers over declaration fragments: splitting lists, attribute and type
//! parameter lists, body dedenting.

use super::errors::{ErrorCode, ParseContext, SyntaxError};
use super::scanner::{
    LiteralRules, Scanner, is_identifier_continue, is_identifier_start, opens_type_arguments,
};
use crate::base::Position;
use crate::elements::{AttributeElement, TypeParameter};

/// Walk `text` calling `visit(byte_offset, char)` for every character that
/// sits outside brackets, generic argument lists and string literals.
fn for_each_top_level(text: &str, rules: LiteralRules, mut visit: impl FnMut(usize, char) -> bool) {
    let mut depth = 0usize;
    let mut angles = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut previous: Option<char> = None;
    for (offset, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' && rules.backslash_escapes {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            previous = Some(c);
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '<' if previous.is_some_and(is_identifier_continue)
                && opens_type_arguments(text[offset..].chars()) =>
            {
                angles += 1
            }
            '>' if angles > 0 => angles -= 1,
            _ if depth == 0 && angles == 0 => {
                if !visit(offset, c) {
                    return;
                }
            }
            _ => {}
        }
        previous = Some(c);
    }
}

/// Split on `separator` at the top level, trimming pieces and dropping
/// empty ones.
pub fn split_top_level(text: &str, separator: char, rules: LiteralRules) -> Vec<String> {
    let mut cuts = Vec::new();
    for_each_top_level(text, rules, |offset, c| {
        if c == separator {
            cuts.push(offset);
        }
        true
    });
    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        pieces.push(&text[start..cut]);
        start = cut + separator.len_utf8();
    }
    pieces.push(&text[start..]);
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}

/// Byte offset of the first top-level `target` character in `text`.
pub fn find_top_level_char(text: &str, target: char, rules: LiteralRules) -> Option<usize> {
    let mut found = None;
    for_each_top_level(text, rules, |offset, c| {
        if c == target {
            found = Some(offset);
            return false;
        }
        true
    });
    found
}

/// Byte offset of `word` as a whole word at the top level of `text`.
pub fn find_top_level_word(
    text: &str,
    word: &str,
    ignore_case: bool,
    rules: LiteralRules,
) -> Option<usize> {
    let mut found = None;
    for_each_top_level(text, rules, |offset, _| {
        let Some(candidate) = text.get(offset..offset + word.len()) else {
            return true;
        };
        let equal = if ignore_case {
            candidate.eq_ignore_ascii_case(word)
        } else {
            candidate == word
        };
        let before_ok = text[..offset]
            .chars()
            .next_back()
            .is_none_or(|c| !is_identifier_continue(c) && c != '.');
        let after_ok = text[offset + word.len()..]
            .chars()
            .next()
            .is_none_or(|c| !is_identifier_continue(c));
        if equal && before_ok && after_ok {
            found = Some(offset);
            return false;
        }
        true
    });
    found
}

/// Trim body text and strip the indentation its lines share. When the text
/// does not start on a fresh line, the first line is trimmed on its own.
pub fn dedent(text: &str) -> String {
    let fresh_line = text.trim_start_matches([' ', '\t']).starts_with(['\n', '\r']);
    let trimmed = text.trim_matches(|c: char| c == '\n' || c == '\r');
    let lines: Vec<&str> = trimmed.lines().collect();
    let skip = usize::from(!fresh_line && lines.len() > 1);
    let indent = lines
        .iter()
        .skip(skip)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    let dedented: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            if line.trim().is_empty() {
                ""
            } else if index < skip {
                line.trim()
            } else {
                line.get(indent..).unwrap_or(line.trim_start()).trim_end()
            }
        })
        .collect();
    dedented.join("\n").trim().to_string()
}

/// Split a leading `target:` off an attribute list.
fn split_target(text: &str) -> (Option<&str>, &str) {
    let Some(colon) = text.find(':') else {
        return (None, text);
    };
    let candidate = text[..colon].trim();
    let is_target = !candidate.is_empty()
        && candidate.chars().all(is_identifier_continue)
        && !text[colon + 1..].starts_with(['=', ':']);
    if is_target {
        (Some(candidate), text[colon + 1..].trim())
    } else {
        (None, text)
    }
}

fn parse_attribute(piece: &str, position: Position) -> Result<AttributeElement, SyntaxError> {
    let (name, body) = match piece.find('(') {
        Some(open) if piece.ends_with(')') => (
            piece[..open].trim(),
            Some(piece[open + 1..piece.len() - 1].trim()),
        ),
        Some(_) => {
            return Err(SyntaxError::builder(ErrorCode::E0203)
                .message("expected ')'")
                .at(position)
                .text(piece)
                .context(ParseContext::AttributeList)
                .build());
        }
        None => (piece, None),
    };
    if !name.starts_with(is_identifier_start) {
        return Err(SyntaxError::builder(ErrorCode::E0301)
            .message("expected attribute name")
            .at(position)
            .text(piece)
            .context(ParseContext::AttributeList)
            .build());
    }
    let mut attribute = AttributeElement::new(name);
    attribute.body_text = body.map(String::from);
    Ok(attribute)
}

/// Parse the inside of one attribute list (`[...]` or `<...>`). The first
/// attribute carries the list's target; the rest are chained as its
/// children.
pub fn parse_attribute_list(
    inner: &str,
    rules: LiteralRules,
    position: Position,
) -> Result<AttributeElement, SyntaxError> {
    let (target, rest) = split_target(inner.trim());
    let mut pieces = split_top_level(rest, ',', rules).into_iter();
    let Some(first) = pieces.next() else {
        return Err(SyntaxError::builder(ErrorCode::E0301)
            .message("expected attribute name")
            .at(position)
            .context(ParseContext::AttributeList)
            .build());
    };
    let mut attribute = parse_attribute(&first, position)?;
    attribute.target = target.map(String::from);
    for piece in pieces {
        attribute.children.push(parse_attribute(&piece, position)?);
    }
    Ok(attribute)
}

fn list_error(message: String, found: &str, position: Position) -> SyntaxError {
    SyntaxError::builder(ErrorCode::E0304)
        .message(message)
        .at(position)
        .text(found)
        .context(ParseContext::TypeParameterList)
        .build()
}

/// Read a type name: dotted identifiers with optional generic arguments,
/// array and nullable suffixes.
pub fn read_type_name(scanner: &mut Scanner) -> Result<Option<String>, SyntaxError> {
    let mut name = String::new();
    loop {
        let Some(part) = scanner.read_identifier() else {
            break;
        };
        name.push_str(&part);
        loop {
            match scanner.peek() {
                Some('(') => {
                    let inner = scanner.capture_block('(', ')', ")", ParseContext::TypeParameterList)?;
                    name.push('(');
                    name.push_str(&inner);
                    name.push(')');
                }
                Some('<') => {
                    let inner = scanner.capture_block('<', '>', ">", ParseContext::TypeParameterList)?;
                    name.push('<');
                    name.push_str(&inner);
                    name.push('>');
                }
                Some(c @ ('?' | '[')) => {
                    if c == '[' {
                        let inner = scanner.capture_block('[', ']', "]", ParseContext::TypeParameterList)?;
                        name.push('[');
                        name.push_str(&inner);
                        name.push(']');
                    } else {
                        scanner.advance();
                        name.push(c);
                    }
                }
                _ => break,
            }
        }
        if !scanner.eat('.') {
            break;
        }
        name.push('.');
    }
    Ok((!name.is_empty()).then_some(name))
}

/// Parse a C# type parameter list (the text between `<` and `>`).
pub fn parse_csharp_type_parameters(
    inner: &str,
    position: Position,
) -> Result<Vec<TypeParameter>, SyntaxError> {
    let mut scanner = Scanner::new(inner, LiteralRules::CSHARP).with_origin(position);
    let mut parameters = Vec::new();
    loop {
        scanner.skip_whitespace();
        while scanner.peek() == Some('[') {
            scanner.capture_block('[', ']', "]", ParseContext::AttributeList)?;
            scanner.skip_whitespace();
        }
        for variance in ["in", "out"] {
            if scanner.starts_with_word(variance, false) {
                scanner.eat_str(variance);
                scanner.skip_whitespace();
            }
        }
        let at = scanner.position();
        let Some(name) = scanner.read_identifier() else {
            let found = scanner.peek().map(String::from).unwrap_or_default();
            return Err(list_error("expected type parameter name".into(), &found, at));
        };
        parameters.push(TypeParameter::new(name));
        scanner.skip_whitespace();
        match scanner.peek() {
            None => return Ok(parameters),
            Some(',') => {
                scanner.advance();
            }
            Some(c) => {
                return Err(list_error(
                    "expected ',' or '>'".into(),
                    &c.to_string(),
                    scanner.position(),
                ));
            }
        }
    }
}

/// Apply `where T : a, b` clauses to already declared type parameters.
pub fn apply_where_clauses(
    text: &str,
    parameters: &mut [TypeParameter],
    position: Position,
) -> Result<(), SyntaxError> {
    let rules = LiteralRules::CSHARP;
    let mut rest = text.trim();
    while !rest.is_empty() {
        let Some(body) = rest.strip_prefix("where") else {
            return Err(list_error("expected 'where'".into(), rest, position));
        };
        let end = find_top_level_word(body, "where", false, rules).unwrap_or(body.len());
        let clause = &body[..end];
        rest = body[end..].trim();
        let Some((name, constraints)) = clause.split_once(':') else {
            return Err(SyntaxError::builder(ErrorCode::E0201)
                .message("expected ':'")
                .at(position)
                .text(clause.trim())
                .context(ParseContext::TypeParameterList)
                .build());
        };
        let name = name.trim();
        let Some(parameter) = parameters.iter_mut().find(|p| p.name == name) else {
            return Err(SyntaxError::builder(ErrorCode::E0305)
                .message(format!("unknown type parameter '{name}'"))
                .at(position)
                .text(name)
                .context(ParseContext::TypeParameterList)
                .build());
        };
        parameter.constraints = split_top_level(constraints, ',', rules);
    }
    Ok(())
}

/// Parse a Visual Basic type parameter list (the text between `(` and `)`,
/// starting with `Of`). Each parameter is `Name [As constraint]` where the
/// constraint is one bare type or a `{...}` set.
pub fn parse_vb_type_parameters(
    inner: &str,
    position: Position,
) -> Result<Vec<TypeParameter>, SyntaxError> {
    let rules = LiteralRules::VISUAL_BASIC;
    let mut scanner = Scanner::new(inner, rules).with_origin(position);
    scanner.skip_whitespace();
    if !scanner.starts_with_word("Of", true) {
        return Err(list_error("expected 'Of'".into(), inner.trim(), position));
    }
    scanner.advance();
    scanner.advance();
    let mut parameters = Vec::new();
    loop {
        scanner.skip_whitespace();
        for variance in ["In", "Out"] {
            if scanner.starts_with_word(variance, true) {
                for _ in 0..variance.len() {
                    scanner.advance();
                }
                scanner.skip_whitespace();
            }
        }
        let at = scanner.position();
        let Some(name) = scanner.read_identifier() else {
            let found = scanner.peek().map(String::from).unwrap_or_default();
            return Err(list_error("expected type parameter name".into(), &found, at));
        };
        let mut parameter = TypeParameter::new(name);
        scanner.skip_whitespace();
        if scanner.starts_with_word("As", true) {
            scanner.advance();
            scanner.advance();
            scanner.skip_whitespace();
            if scanner.peek() == Some('{') {
                let set = scanner.capture_block('{', '}', "}", ParseContext::TypeParameterList)?;
                parameter.constraints = split_top_level(&set, ',', rules);
            } else {
                let at = scanner.position();
                let Some(constraint) = read_type_name(&mut scanner)? else {
                    let found = scanner.peek().map(String::from).unwrap_or_default();
                    return Err(list_error("expected constraint".into(), &found, at));
                };
                parameter.constraints.push(constraint);
            }
            scanner.skip_whitespace();
        }
        parameters.push(parameter);
        match scanner.peek() {
            None => return Ok(parameters),
            Some(',') => {
                scanner.advance();
            }
            Some(c) => {
                return Err(list_error(
                    "expected ',' or ')'".into(),
                    &c.to_string(),
                    scanner.position(),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_top_level_respects_nesting() {
        let pieces = split_top_level(
            "IComparable<T, U>, Foo(\"a,b\"), Bar[1, 2]",
            ',',
            LiteralRules::CSHARP,
        );
        assert_eq!(pieces, vec!["IComparable<T, U>", "Foo(\"a,b\")", "Bar[1, 2]"]);
    }

    #[test]
    fn test_find_top_level_word() {
        let text = "Foo(ByVal x As Integer) As String Implements IFoo.Bar";
        let rules = LiteralRules::VISUAL_BASIC;
        let found = find_top_level_word(text, "As", true, rules).unwrap();
        assert_eq!(&text[found..found + 9], "As String");
        assert!(find_top_level_word(text, "Handles", true, rules).is_none());
        assert!(find_top_level_word("IWhere.x", "where", true, rules).is_none());
    }

    #[test]
    fn test_find_top_level_char_skips_nested_and_strings() {
        let rules = LiteralRules::VISUAL_BASIC;
        let text = "x(a = 1) As String = \"=\"";
        assert_eq!(find_top_level_char(text, '=', rules), Some(19));
        assert_eq!(find_top_level_char("Foo(\"=\")", '=', rules), None);
    }

    #[test]
    fn test_dedent() {
        let body = "\n        if (x)\n        {\n            y();\n        }\n    ";
        assert_eq!(dedent(body), "if (x)\n{\n    y();\n}");
        assert_eq!(dedent(" return 1; "), "return 1;");
        assert_eq!(dedent(" a();\n        b();\n    "), "a();\nb();");
    }

    #[test]
    fn test_attribute_list_with_target_and_chain() {
        let attribute = parse_attribute_list(
            "assembly: AssemblyTitle(\"x\"), CLSCompliant(true)",
            LiteralRules::CSHARP,
            Position::start(),
        )
        .unwrap();
        assert_eq!(attribute.target.as_deref(), Some("assembly"));
        assert_eq!(attribute.name, "AssemblyTitle");
        assert_eq!(attribute.body_text.as_deref(), Some("\"x\""));
        assert_eq!(attribute.children.len(), 1);
        assert_eq!(attribute.children[0].name, "CLSCompliant");
        assert!(attribute.is_file_level());
    }

    #[test]
    fn test_vb_named_argument_is_not_a_target() {
        let attribute = parse_attribute_list(
            "Obsolete(Message:=\"old\")",
            LiteralRules::VISUAL_BASIC,
            Position::start(),
        )
        .unwrap();
        assert_eq!(attribute.target, None);
        assert_eq!(attribute.name, "Obsolete");
    }

    #[test]
    fn test_csharp_type_parameters_and_constraints() {
        let mut params = parse_csharp_type_parameters("T, out U", Position::start()).unwrap();
        assert_eq!(params.len(), 2);
        apply_where_clauses(
            "where T : class, IComparable<T>, new() where U : T",
            &mut params,
            Position::start(),
        )
        .unwrap();
        assert_eq!(params[0].constraints, vec!["class", "IComparable<T>", "new()"]);
        assert_eq!(params[1].constraints, vec!["T"]);
    }

    #[test]
    fn test_where_clause_unknown_parameter() {
        let mut params = parse_csharp_type_parameters("T", Position::start()).unwrap();
        let err = apply_where_clauses("where X : class", &mut params, Position::start()).unwrap_err();
        assert_eq!(err.code, ErrorCode::E0305);
        assert!(err.message.contains("'X'"));
    }

    #[test]
    fn test_csharp_type_parameter_list_error_names_expected_token() {
        let err = parse_csharp_type_parameters("T U", Position::start()).unwrap_err();
        assert_eq!(err.message, "expected ',' or '>'");
        assert_eq!(err.text, "U");
    }

    #[test]
    fn test_vb_type_parameters() {
        let params = parse_vb_type_parameters(
            "Of T As {IComparable, New}, U As Class, V",
            Position::start(),
        )
        .unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].constraints, vec!["IComparable", "New"]);
        assert_eq!(params[1].constraints, vec!["Class"]);
        assert!(params[2].constraints.is_empty());
    }

    #[test]
    fn test_vb_type_parameter_list_error() {
        let err = parse_vb_type_parameters("Of T As Class U", Position::start()).unwrap_err();
        assert_eq!(err.message, "expected ',' or ')'");
        assert_eq!(err.code, ErrorCode::E0304);
    }
}
