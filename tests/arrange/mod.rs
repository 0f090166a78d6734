//! Parsing and arranging whole files
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rstest::rstest;

use arranger::condition::ElementAttribute;
use arranger::config::{ConfigurationElement, ElementConfiguration, GroupBy, SortBy, SortDirection};
use arranger::elements::{
    AttributeElement, CodeAccess, CommentElement, ConstructorElement, MethodElement,
    PropertyElement, TypeElementType,
};
use arranger::{
    ArrangeConfiguration, Arranger, CodeElement, ElementKind, ElementType, FileContext, Language,
};

use crate::helpers::{arrange_standard, names};

const WIDGET_CS: &str = r#"
using System.IO;
using System;
using Acme.Tools;

namespace Demo
{
    public class Widget
    {
        public void Zeta() { }

        private int _count;

        /// <summary>Builds a widget.</summary>
        public Widget() { }

        public string Name { get; set; }

        [Obsolete]
        public void Alpha() { }

        private void Helper() { }
    }
}
"#;

const WIDGET_VB: &str = r#"
Imports System.IO
Imports System

Namespace Demo
    Public Class Widget
        Public Sub Zeta()
        End Sub

        Private _count As Integer

        ' Builds a widget.
        Public Sub New()
        End Sub

        <Obsolete>
        Public Sub Alpha()
        End Sub
    End Class
End Namespace
"#;

#[test]
fn test_csharp_standard_layout() {
    let arranged = arrange_standard(Language::CSharp, "Widget.cs", WIDGET_CS);
    assert_eq!(names(&arranged), ["Acme", "System", "Demo"]);
    assert!(arranged[0].is_group());
    assert_eq!(names(&arranged[1].children), ["System", "System.IO"]);

    let widget = &arranged[2].children[0];
    assert_eq!(
        names(&widget.children),
        ["Fields", "Constructors", "Properties", "Methods"]
    );
    assert!(widget.children.iter().all(|c| c.element_type() == ElementType::Region));

    let methods = &widget.children[3].children;
    assert_eq!(names(methods), ["Alpha", "Zeta", "Helper"]);
    assert_eq!(methods[0].attributes[0].name, "Obsolete");

    let constructor = &widget.children[1].children[0];
    assert_eq!(constructor.element_type(), ElementType::Constructor);
    assert_eq!(constructor.header_comments.len(), 1);
}

#[test]
fn test_visual_basic_standard_layout() {
    let arranged = arrange_standard(Language::VisualBasic, "Widget.vb", WIDGET_VB);
    assert_eq!(names(&arranged), ["System", "Demo"]);
    assert_eq!(names(&arranged[0].children), ["System", "System.IO"]);

    let widget = &arranged[1].children[0];
    assert_eq!(names(&widget.children), ["Fields", "Constructors", "Methods"]);
    assert_eq!(names(&widget.children[2].children), ["Alpha", "Zeta"]);
    let constructor = &widget.children[1].children[0];
    assert_eq!(constructor.header_comments, [CommentElement::line(" Builds a widget.")]);
}

#[rstest]
#[case::csharp(Language::CSharp, "Widget.cs", WIDGET_CS)]
#[case::visual_basic(Language::VisualBasic, "Widget.vb", WIDGET_VB)]
fn test_arranged_output_is_stable(
    #[case] language: Language,
    #[case] path: &str,
    #[case] source: &str,
) {
    let arranger = Arranger::new(&ArrangeConfiguration::standard()).unwrap();
    let file = FileContext::new(path);
    let once = arrange_standard(language, path, source);
    assert_eq!(arranger.arrange(&once, &file), once);
}

#[test]
fn test_filter_on_parsed_members() {
    let config = ArrangeConfiguration::new(vec![ConfigurationElement::element(
        ElementConfiguration::new(ElementType::Type).with_elements(vec![
            ConfigurationElement::element(
                ElementConfiguration::new(ElementType::Method)
                    .with_filter("$(Access) == 'Public' And !($(Name) : 'Help')")
                    .with_sort_by(SortBy::new(ElementAttribute::Name, SortDirection::Descending)),
            ),
            ConfigurationElement::element(ElementConfiguration::new(ElementType::Field)),
        ]),
    )]);
    let arranger = Arranger::new(&config).unwrap();
    let tree = arranger::parse_csharp(
        "class C { void Helper() { } public void A() { } int x; public void B() { } }",
    )
    .unwrap();
    let arranged = arranger.arrange(&tree, &FileContext::new("C.cs"));
    // Helper is rejected by the only method rule and dropped.
    assert_eq!(names(&arranged[0].children), ["B", "A", "x"]);
}

// ============================================================================
// PROPERTIES
// ============================================================================

const ACCESS: [CodeAccess; 6] = [
    CodeAccess::None,
    CodeAccess::Private,
    CodeAccess::Protected,
    CodeAccess::Internal,
    CodeAccess::ProtectedInternal,
    CodeAccess::Public,
];

fn member(
    index: usize,
    kind: u8,
    name: &str,
    access: usize,
    comment: Option<String>,
    attributed: bool,
) -> CodeElement {
    let name = format!("{name}{index}");
    let mut element = match kind {
        0 => CodeElement::field(name, "int"),
        1 => CodeElement::new(name, ElementKind::Method(MethodElement::new(None, ""))),
        2 => CodeElement::new(name, ElementKind::Property(PropertyElement::new("string"))),
        3 => CodeElement::new(name, ElementKind::Constructor(ConstructorElement::new(""))),
        _ => return CodeElement::comment(CommentElement::line(format!(" note {index}"))),
    }
    .with_access(ACCESS[access]);
    element.header_comments.extend(comment.map(CommentElement::line));
    if attributed {
        element.attributes.push(AttributeElement::new("Obsolete"));
    }
    element
}

fn class_members() -> impl Strategy<Value = Vec<CodeElement>> {
    prop::collection::vec(
        (0u8..5, "[a-zA-Z]{1,6}", 0usize..6, prop::option::of("[ a-z]{0,8}"), any::<bool>()),
        0..16,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(index, (kind, name, access, comment, attributed))| {
                member(index, kind, &name, access, comment, attributed)
            })
            .collect()
    })
}

/// Every non-synthetic element with what travels with it, in a stable order.
fn inventory(elements: &[CodeElement]) -> Vec<CodeElement> {
    let mut found = Vec::new();
    arranger::elements::walk(elements, &mut |element, _| {
        if !matches!(element.kind, ElementKind::Region(_) | ElementKind::Group(_)) {
            let mut copy = element.clone();
            copy.children.clear();
            found.push(copy);
        }
    });
    found.sort_by_cached_key(|element| format!("{element:?}"));
    found
}

fn by_access_groups() -> Arranger {
    Arranger::new(&ArrangeConfiguration::new(vec![ConfigurationElement::element(
        ElementConfiguration::any()
            .with_group_by(GroupBy::new(ElementAttribute::Access).with_direction(SortDirection::Descending))
            .with_sort_by(SortBy::new(ElementAttribute::Name, SortDirection::Ascending)),
    )]))
    .unwrap()
}

proptest! {
    #[test]
    fn prop_standard_layout_is_idempotent(members in class_members()) {
        let input = vec![CodeElement::type_element("Widget", TypeElementType::Class).with_children(members)];
        let arranger = Arranger::new(&ArrangeConfiguration::standard()).unwrap();
        let file = FileContext::new("Widget.cs");
        let once = arranger.arrange(&input, &file);
        let twice = arranger.arrange(&once, &file);
        prop_assert_eq!(&once, &twice);
    }

    #[test]
    fn prop_standard_layout_conserves_elements(members in class_members()) {
        let input = vec![CodeElement::type_element("Widget", TypeElementType::Class).with_children(members)];
        let arranger = Arranger::new(&ArrangeConfiguration::standard()).unwrap();
        let arranged = arranger.arrange(&input, &FileContext::new("Widget.cs"));
        prop_assert_eq!(inventory(&arranged), inventory(&input));
    }

    #[test]
    fn prop_grouping_is_idempotent_and_conserving(members in class_members()) {
        let arranger = by_access_groups();
        let file = FileContext::new("Flat.cs");
        let once = arranger.arrange(&members, &file);
        prop_assert!(once.iter().all(CodeElement::is_group));
        prop_assert_eq!(inventory(&once), inventory(&members));
        prop_assert_eq!(arranger.arrange(&once, &file), once);
    }
}
