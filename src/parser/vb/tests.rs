#![allow(clippy::unwrap_used)]

use rstest::rstest;

use super::VbParser;
use crate::elements::{
    CodeAccess, CodeElement, ElementKind, ElementType, InterfaceReferenceType, Modifiers,
    OperatorType, TypeElementType,
};
use crate::parser::errors::ErrorCode;
use crate::parser::{CommentRegionMarkers, ParserOptions, SyntaxError};

fn parse(source: &str) -> Vec<CodeElement> {
    VbParser::default()
        .parse(source)
        .unwrap_or_else(|e| panic!("parse failed: {}", e.format()))
}

fn parse_err(source: &str) -> SyntaxError {
    match VbParser::default().parse(source) {
        Ok(elements) => panic!("expected an error, parsed {elements:?}"),
        Err(err) => err,
    }
}

/// Members of a class wrapped around `body`.
fn members(body: &str) -> Vec<CodeElement> {
    let source = format!("Public Class Sample\n{body}\nEnd Class\n");
    let mut tree = parse(&source);
    tree.remove(0).children
}

fn names(elements: &[CodeElement]) -> Vec<&str> {
    elements.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn test_comment_equal_to_closer_does_not_end_body() {
    let members = members("    Public Sub Run()\n        'End Sub\n    End Sub");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name, "Run");
    assert_eq!(members[0].body_text.as_deref(), Some("'End Sub"));
}

#[test]
fn test_string_equal_to_closer_does_not_end_body() {
    let members = members(
        "    Function Label() As String\n        Return \"End Function\"\n    End Function",
    );
    assert_eq!(members.len(), 1);
    assert_eq!(
        members[0].body_text.as_deref(),
        Some("Return \"End Function\"")
    );
    assert_eq!(members[0].type_text(), "String");
}

#[test]
fn test_multi_declarator_fan_out() {
    let members = members("    Private a, b As Integer");
    assert_eq!(names(&members), ["a", "b"]);
    for field in &members {
        assert_eq!(field.access, CodeAccess::Private);
        assert_eq!(field.type_text(), "Integer");
        let ElementKind::Field(payload) = &field.kind else {
            panic!("expected a field");
        };
        assert_eq!(payload.initial_value, None);
    }
}

#[test]
fn test_each_as_clause_types_names_since_previous() {
    let members = members("    Dim a, b As Integer, c As String = \"x\", d() As Byte");
    assert_eq!(names(&members), ["a", "b", "c", "d"]);
    let types: Vec<&str> = members.iter().map(|m| m.type_text()).collect();
    assert_eq!(types, ["Integer", "Integer", "String", "Byte()"]);
    let ElementKind::Field(c) = &members[2].kind else {
        panic!("expected a field");
    };
    assert_eq!(c.initial_value.as_deref(), Some("\"x\""));
    assert!(c.declared_with_dim);
}

#[test]
fn test_namespace_type_and_members() {
    let tree = parse(
        r#"Option Strict On
Imports System, IO = System.IO

Namespace Demo
    ''' <summary>A widget</summary>
    <Serializable()> _
    Public MustInherit Class Widget(Of T As {Class, New})
        Inherits Component
        Implements IDisposable, IComparable

        Private WithEvents _timer As Timer ' ticks

        Public Sub New(ByVal name As String)
            MyBase.New()
        End Sub

        Public Property Name As String

        Public ReadOnly Property Count() As Integer
            Get
                Return 0
            End Get
        End Property

        Public MustOverride Function Compute(Of U)(ByVal x As U) As T

        Public Sub Dispose() Implements IDisposable.Dispose
        End Sub

        Private Sub OnTick(sender As Object, e As EventArgs) Handles _timer.Tick, _timer.Elapsed
        End Sub

        Public Event Changed As EventHandler
        Public Delegate Function Transform(ByVal value As T) As T
    End Class
End Namespace
"#,
    );
    assert_eq!(tree.len(), 4);
    assert!(matches!(&tree[0].kind, ElementKind::RawText(text) if text == "Option Strict On"));
    assert_eq!(tree[1].name, "System");
    assert_eq!(tree[2].name, "System.IO");
    let ElementKind::Using(alias) = &tree[2].kind else {
        panic!("expected an import");
    };
    assert_eq!(alias.redefine.as_deref(), Some("IO"));

    let namespace = &tree[3];
    assert_eq!(namespace.name, "Demo");
    let class = &namespace.children[0];
    assert_eq!(class.name, "Widget");
    assert_eq!(class.header_comments.len(), 1);
    assert_eq!(class.attributes[0].name, "Serializable");
    assert!(class.modifiers.contains(Modifiers::ABSTRACT));
    assert_eq!(class.type_parameters[0].constraints, ["Class", "New"]);
    let ElementKind::Type(ty) = &class.kind else {
        panic!("expected a type");
    };
    let bases: Vec<(&str, InterfaceReferenceType)> = ty
        .interfaces
        .iter()
        .map(|i| (i.name.as_str(), i.reference_type))
        .collect();
    assert_eq!(
        bases,
        [
            ("Component", InterfaceReferenceType::Class),
            ("IDisposable", InterfaceReferenceType::Interface),
            ("IComparable", InterfaceReferenceType::Interface),
        ]
    );

    let kinds: Vec<ElementType> = class.children.iter().map(|e| e.element_type()).collect();
    assert_eq!(
        kinds,
        [
            ElementType::Field,
            ElementType::Constructor,
            ElementType::Property,
            ElementType::Property,
            ElementType::Method,
            ElementType::Method,
            ElementType::Method,
            ElementType::Event,
            ElementType::Delegate,
        ]
    );
    let timer = &class.children[0];
    let ElementKind::Field(field) = &timer.kind else {
        panic!("expected a field");
    };
    assert!(field.with_events);
    assert_eq!(
        timer.trailing_comment.as_ref().map(|c| c.text.as_str()),
        Some(" ticks")
    );
    assert_eq!(class.children[1].body_text.as_deref(), Some("MyBase.New()"));
    assert_eq!(class.children[2].body_text, None);
    assert_eq!(
        class.children[3].body_text.as_deref(),
        Some("Get\n    Return 0\nEnd Get")
    );
    let compute = &class.children[4];
    assert_eq!(compute.body_text, None);
    assert_eq!(compute.type_parameters[0].name, "U");

    let ElementKind::Method(dispose) = &class.children[5].kind else {
        panic!("expected a method");
    };
    assert_eq!(dispose.implements[0].name, "IDisposable.Dispose");
    assert_eq!(dispose.return_type, None);
    let ElementKind::Method(on_tick) = &class.children[6].kind else {
        panic!("expected a method");
    };
    assert_eq!(on_tick.handles, ["_timer.Tick", "_timer.Elapsed"]);
}

#[test]
fn test_end_line_comments_are_kept() {
    let tree = parse(
        "Public Class C\n    Public Sub Foo() ' head\n    End Sub ' tail\nEnd Class ' done\n",
    );
    let class = &tree[0];
    assert_eq!(
        class.trailing_comment.as_ref().map(|c| c.text.as_str()),
        Some(" done")
    );
    let foo = &class.children[0];
    assert_eq!(foo.name, "Foo");
    let headers: Vec<&str> = foo.header_comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(headers, [" head"]);
    assert_eq!(
        foo.trailing_comment.as_ref().map(|c| c.text.as_str()),
        Some(" tail")
    );
}

#[test]
fn test_header_line_comment_trails_block_without_end_comment() {
    let members = members("    ' about Foo\n    Sub Foo() ' head\n    End Sub");
    let headers: Vec<&str> = members[0].header_comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(headers, [" about Foo"]);
    assert_eq!(
        members[0].trailing_comment.as_ref().map(|c| c.text.as_str()),
        Some(" head")
    );
}

#[test]
fn test_implements_keeps_every_reference_in_order() {
    let members = members(
        "    Public Sub Run() Implements IA.Run, IB.Run, IA.Run
    End Sub",
    );
    let ElementKind::Method(run) = &members[0].kind else {
        panic!("expected a method");
    };
    let implements: Vec<&str> = run.implements.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(implements, ["IA.Run", "IB.Run", "IA.Run"]);
    assert!(
        run.implements
            .iter()
            .all(|i| i.reference_type == InterfaceReferenceType::Interface)
    );
}

#[test]
fn test_as_new_initializes_every_name_sharing_the_clause() {
    let members = members("    Dim a, b As New Foo()
    Dim c As Foo, d As New Bar(1)");
    assert_eq!(names(&members), ["a", "b", "c", "d"]);
    let values: Vec<(&str, Option<&str>)> = members
        .iter()
        .map(|m| {
            let ElementKind::Field(field) = &m.kind else {
                panic!("expected a field");
            };
            (m.type_text(), field.initial_value.as_deref())
        })
        .collect();
    assert_eq!(
        values,
        [
            ("Foo", Some("New Foo()")),
            ("Foo", Some("New Foo()")),
            ("Foo", None),
            ("Bar", Some("New Bar(1)")),
        ]
    );
}

#[test]
fn test_interface_members_have_no_bodies() {
    let tree = parse(
        "Public Interface IShape\n    Function Area() As Double\n    Property Name As String\n    Sub Draw()\nEnd Interface\n",
    );
    let shape = &tree[0];
    assert_eq!(names(&shape.children), ["Area", "Name", "Draw"]);
    assert!(shape.children.iter().all(|m| m.body_text.is_none()));
}

#[test]
fn test_multi_line_lambda_end_does_not_close_method() {
    let members = members(
        r#"    Sub Wire()
        Dim handler = Sub(x As Integer)
                          Console.WriteLine(x)
                      End Sub
        handler(1)
    End Sub
    Sub After()
    End Sub"#,
    );
    assert_eq!(names(&members), ["Wire", "After"]);
    assert!(
        members[0]
            .body_text
            .as_deref()
            .unwrap()
            .ends_with("handler(1)")
    );
}

#[test]
fn test_line_continuation_in_signature() {
    let members = members(
        "    Public Function Add(ByVal a As Integer, _\n                        ByVal b As Integer) As Integer\n        Return a + b\n    End Function",
    );
    let ElementKind::Method(add) = &members[0].kind else {
        panic!("expected a method");
    };
    assert_eq!(add.parameters, "ByVal a As Integer, ByVal b As Integer");
    assert_eq!(members[0].body_text.as_deref(), Some("Return a + b"));
}

#[test]
fn test_declare_external_method() {
    let members = members(
        "    Private Declare Auto Function GetTick Lib \"kernel32\" Alias \"GetTickCount\" () As Integer",
    );
    let method = &members[0];
    assert!(method.modifiers.contains(Modifiers::EXTERNAL));
    assert_eq!(method.access, CodeAccess::Private);
    let ElementKind::Method(payload) = &method.kind else {
        panic!("expected a method");
    };
    let external = payload.external.as_ref().unwrap();
    assert_eq!(external.library.as_deref(), Some("kernel32"));
    assert_eq!(external.alias.as_deref(), Some("GetTickCount"));
    assert_eq!(external.charset.as_deref(), Some("Auto"));
    assert_eq!(payload.return_type.as_deref(), Some("Integer"));
}

#[test]
fn test_operators_and_custom_events() {
    let members = members(
        r#"    Public Shared Operator +(ByVal a As Money, ByVal b As Money) As Money
        Return a
    End Operator
    Public Shared Widening Operator CType(ByVal m As Money) As Decimal
        Return m.Value
    End Operator
    Public Custom Event Changed As EventHandler
        AddHandler(ByVal value As EventHandler)
        End AddHandler
        RemoveHandler(ByVal value As EventHandler)
        End RemoveHandler
        RaiseEvent(ByVal sender As Object, ByVal e As EventArgs)
        End RaiseEvent
    End Event"#,
    );
    assert_eq!(names(&members), ["+", "Decimal", "Changed"]);
    let ElementKind::Method(conversion) = &members[1].kind else {
        panic!("expected an operator");
    };
    assert!(conversion.is_operator);
    assert_eq!(conversion.operator_type, OperatorType::Implicit);
    let ElementKind::Event(event) = &members[2].kind else {
        panic!("expected an event");
    };
    assert!(event.is_custom);
    assert!(members[2].body_text.as_deref().unwrap().starts_with("AddHandler"));
}

#[test]
fn test_enum_and_module() {
    let tree = parse("Enum Color As Byte\n    Red\n    Green = 2\nEnd Enum\nModule Helpers\n    Sub Main()\n    End Sub\nEnd Module\n");
    assert_eq!(tree[0].body_text.as_deref(), Some("Red\nGreen = 2"));
    let ElementKind::Type(module) = &tree[1].kind else {
        panic!("expected a module");
    };
    assert_eq!(module.type_kind, TypeElementType::Module);
}

#[test]
fn test_regions_conditionals_and_comments() {
    let members = members(
        r#"    ' detached

    #Region "Fields"
    Private a As Integer
    #If DEBUG Then
    Private b As Integer
    #Else
    Private c As Integer
    #End If
    #End Region"#,
    );
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].element_type(), ElementType::Comment);
    let region = &members[1];
    assert_eq!(region.name, "Fields");
    let ElementKind::ConditionDirective(directive) = &region.children[1].kind else {
        panic!("expected a conditional block");
    };
    assert_eq!(directive.branches[0].condition, "DEBUG");
    assert_eq!(names(&directive.branches[0].children), ["b"]);
    assert_eq!(directive.else_body.as_deref().map(names), Some(vec!["c"]));
}

#[test]
fn test_comment_marker_regions() {
    let options = ParserOptions::default().with_comment_regions(CommentRegionMarkers::default());
    let tree = VbParser::new(options)
        .parse("Class C\n    ' $(Begin) Fields\n    Private a As Integer\n    ' $(End) Fields\nEnd Class\n")
        .unwrap();
    let region = &tree[0].children[0];
    assert_eq!(region.element_type(), ElementType::Region);
    assert_eq!(names(&region.children), ["a"]);
}

#[test]
fn test_assembly_attribute_stands_alone() {
    let tree = parse("<Assembly: AssemblyTitle(\"Demo\")>\nClass C\nEnd Class\n");
    assert_eq!(tree[0].element_type(), ElementType::Attribute);
    assert_eq!(tree[1].name, "C");
    assert!(tree[1].attributes.is_empty());
}

#[test]
fn test_missing_end_reports_closer_and_position() {
    let err = parse_err("Class C\n    Sub Run()\n    End Sub\n");
    assert_eq!(err.message, "expected 'End Class'");
    assert_eq!((err.line(), err.column()), (4, 1));
}

#[rstest]
#[case::unmatched_end_region("#End Region\n", ErrorCode::E0501, "unmatched end region directive")]
#[case::unclosed_region("#Region \"R\"\n", ErrorCode::E0503, "expected '#End Region'")]
#[case::unclosed_if("#If DEBUG Then\n", ErrorCode::E0504, "expected '#End If'")]
#[case::stray_end("End Class\n", ErrorCode::E0205, "unexpected 'End Class'")]
#[case::attribute_before_end_region("Class C\n#Region \"R\"\n<Obsolete()>\n#End Region\nEnd Class\n", ErrorCode::E0303, "expected declaration after attribute")]
#[case::attribute_before_else("#If DEBUG Then\n<Serializable()>\n#Else\n#End If\n", ErrorCode::E0303, "expected declaration after attribute")]
#[case::mismatched_end("Class C\nEnd Module\n", ErrorCode::E0206, "expected 'End Class'")]
#[case::unclosed_sub("Class C\nSub Run()\n", ErrorCode::E0202, "expected 'End Sub'")]
#[case::missing_name("Class C\nSub ()\nEnd Class\n", ErrorCode::E0301, "expected method name")]
#[case::reserved_field("Class C\nDim [Loop] As Integer, Loop As Integer\nEnd Class\n", ErrorCode::E0302, "'Loop' is a reserved word")]
#[case::unknown_statement("Class C\nFrobnicate\nEnd Class\n", ErrorCode::E0303, "unrecognized construct")]
#[case::bad_type_parameters("Class C(Of T U)\nEnd Class\n", ErrorCode::E0304, "expected ',' or ')'")]
fn test_syntax_errors(#[case] source: &str, #[case] code: ErrorCode, #[case] message: &str) {
    let err = parse_err(source);
    assert_eq!(err.code, code, "{}", err.format());
    assert_eq!(err.message, message);
}
