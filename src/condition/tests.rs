#![allow(clippy::unwrap_used)]

use rstest::rstest;

use super::*;
use crate::elements::{AttributeElement, CodeAccess, CodeElement, Modifiers};

fn name_is(value: &str) -> Expression {
    Expression::compare(
        ComparisonOperator::Equal,
        Operand::element(ElementAttribute::Name),
        Operand::literal(value),
    )
}

fn reason(source: &str) -> String {
    match Condition::parse(source) {
        Ok(condition) => panic!("expected an error, parsed {condition}"),
        Err(ConfigurationError::Format { expression, reason }) => {
            assert_eq!(expression, source);
            reason
        }
        Err(other) => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_and_binds_tighter_than_or() {
    let parsed =
        parse_expression("$(Name) == 'A' Or $(Name) == 'B' And $(Access) == 'Public'").unwrap();
    let access_is_public = Expression::compare(
        ComparisonOperator::Equal,
        Operand::element(ElementAttribute::Access),
        Operand::literal("Public"),
    );
    assert_eq!(
        parsed,
        Expression::or(
            name_is("A"),
            Expression::and(name_is("B"), access_is_public)
        )
    );
}

#[test]
fn test_binary_operators_are_left_associative() {
    let parsed = parse_expression("$(Name) == 'A' Or $(Name) == 'B' Or $(Name) == 'C'").unwrap();
    assert_eq!(
        parsed,
        Expression::or(Expression::or(name_is("A"), name_is("B")), name_is("C"))
    );
}

#[test]
fn test_parentheses_override_precedence() {
    let parsed =
        parse_expression("($(Name) == 'A' Or $(Name) == 'B') And !($(Name) == 'C')").unwrap();
    assert_eq!(
        parsed,
        Expression::and(
            Expression::or(name_is("A"), name_is("B")),
            Expression::not(name_is("C"))
        )
    );
}

#[test]
fn test_scoped_attribute_references() {
    let parsed = parse_expression("$(Element.Type) : 'List' And $(File.Path) =~ 'Tests'").unwrap();
    assert_eq!(
        parsed,
        Expression::and(
            Expression::compare(
                ComparisonOperator::Contains,
                Operand::element(ElementAttribute::Type),
                Operand::literal("List"),
            ),
            Expression::compare(
                ComparisonOperator::Matches,
                Operand::file(FileAttribute::Path),
                Operand::literal("Tests"),
            )
        )
    );
}

#[rstest]
#[case("$(Name) == 'A' Or $(Name) == 'B' And $(Access) == 'Public'")]
#[case("($(Name) == 'A' Or $(Name) == 'B') And $(Modifier) : 'Static'")]
#[case("$(Name) == 'A' Or ($(Name) == 'B' Or $(Name) == 'C')")]
#[case("!($(File.Name) =~ '\\.Designer\\.cs$') And $(Name) != 'It''s'")]
fn test_display_is_canonical(#[case] source: &str) {
    let condition = Condition::parse(source).unwrap();
    let rendered = condition.to_string();
    assert_eq!(rendered, source);
    assert_eq!(Condition::parse(&rendered).unwrap(), condition);
}

#[rstest]
#[case::empty("   ", "empty expression")]
#[case::unterminated("$(Name) == 'abc", "unterminated string literal")]
#[case::unmatched_open("($(Name) == 'a'", "unmatched '('")]
#[case::unmatched_close("$(Name) == 'a')", "unmatched ')'")]
#[case::missing_right("$(Name) ==", "'==' is missing its right operand")]
#[case::missing_left("== 'a'", "'==' is missing its left operand")]
#[case::dangling_and("$(Name) == 'a' And", "'And' is missing its right operand")]
#[case::bare_leaf("$(Name)", "expected comparison operator after $(Name)")]
#[case::composite_operand(
    "($(Name) == 'a') == 'b'",
    "operands of '==' must be attribute references or string literals"
)]
#[case::chained_comparison(
    "$(Name) : 'a' : 'b'",
    "operands of ':' must be attribute references or string literals"
)]
#[case::unknown_attribute("$(Color) == 'red'", "unknown attribute 'Color'")]
#[case::unknown_scope("$(Project.Name) == 'x'", "unknown attribute scope 'Project'")]
#[case::unknown_file_attribute("$(File.Size) == '1'", "unknown file attribute 'Size'")]
#[case::bad_character("$(Name) == 'a' & $(Name) == 'b'", "unexpected character '&' at offset 15")]
fn test_format_errors(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(reason(source), expected);
}

#[test]
fn test_invalid_literal_pattern_fails_at_compile_time() {
    assert!(reason("$(Name) =~ '(unclosed'").starts_with("invalid pattern '(unclosed'"));
}

#[test]
fn test_evaluate_element_and_file_attributes() {
    let mut method = CodeElement::new(
        "TestLoad",
        crate::elements::ElementKind::Method(crate::elements::MethodElement::new(
            Some("void".into()),
            "",
        )),
    )
    .with_access(CodeAccess::Public)
    .with_modifiers(Modifiers::STATIC);
    method.attributes.push(AttributeElement::new("Test"));
    let file = FileContext::new("tests/LoaderTests.cs");

    let cases = [
        ("$(Access) == 'Public' And $(Modifier) : 'Static'", true),
        ("$(Name) =~ '^Test' And $(Attributes) == 'Test'", true),
        ("$(ElementType) == 'Method' And $(Type) == 'void'", true),
        ("$(File.Name) =~ 'Tests\\.cs$'", true),
        ("$(File.Path) : 'src'", false),
        ("!($(Name) : 'Load')", false),
        ("$(Name) == 'testload'", false),
        ("$(Name) != 'Other' Or $(Name) == 'x'", true),
    ];
    for (source, expected) in cases {
        let condition = Condition::parse(source).unwrap();
        assert_eq!(condition.evaluate(&method, &file), expected, "{source}");
    }
}

#[test]
fn test_pattern_from_attribute_is_compiled_on_evaluation() {
    let element = CodeElement::field("abc", "a.c");
    let condition = Condition::parse("$(Name) =~ $(Type)").unwrap();
    assert!(condition.evaluate(&element, &FileContext::default()));

    let broken = CodeElement::field("abc", "(");
    assert!(!condition.evaluate(&broken, &FileContext::default()));
}

#[test]
fn test_compile_built_expression() {
    let condition = Condition::compile(Expression::not(name_is("x"))).unwrap();
    assert_eq!(condition.to_string(), "!($(Name) == 'x')");
    assert!(condition.evaluate(&CodeElement::field("y", "int"), &FileContext::default()));
}
