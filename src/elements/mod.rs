//! Structural element tree produced by the parsers and consumed by the arranger.
//!
//! Every node is a [`CodeElement`]: the attributes shared by all kinds
//! (name, access, modifiers, comments, attributes, type parameters, body text,
//! children) plus a closed [`ElementKind`] payload with the facts only some
//! kinds carry.
//!
//! ```text
//! CodeElement
//!  ├─ header_comments / trailing_comment   travel with the element
//!  ├─ attributes                           travel with the element
//!  ├─ children                             owned, in source order
//!  └─ kind: ElementKind                    per-kind payload
//! ```
//!
//! The tree owns its children only. Code that needs an element's parent walks
//! the tree with [`walk`], which supplies the ancestor chain.

mod access;
mod attribute;
mod comment;
mod directives;
mod members;
mod visit;

pub use access::{CodeAccess, Modifiers};
pub use attribute::AttributeElement;
pub use comment::{CommentElement, CommentType};
pub use directives::{
    ConditionBranch, ConditionDirectiveElement, GroupElement, GroupSeparator, RegionElement,
    RegionStyle,
};
pub use members::{
    ConstructorElement, DelegateElement, EventElement, ExternalMethod, FieldElement,
    InterfaceReference, InterfaceReferenceType, MethodElement, OperatorType, PropertyElement,
    TypeElement, TypeElementType, TypeParameter, UsingElement,
};
pub use visit::{count_elements, walk};


/// Element kind discriminant, used by configuration kind filters and the
/// `ElementType` condition attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementType {
    /// No kind filter: matches every element
    #[default]
    NotSpecified,
    Comment,
    Attribute,
    Using,
    Namespace,
    Region,
    ConditionDirective,
    Field,
    Constructor,
    Property,
    Method,
    Event,
    Delegate,
    Type,
    Group,
    RawText,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotSpecified => "NotSpecified",
            Self::Comment => "Comment",
            Self::Attribute => "Attribute",
            Self::Using => "Using",
            Self::Namespace => "Namespace",
            Self::Region => "Region",
            Self::ConditionDirective => "ConditionDirective",
            Self::Field => "Field",
            Self::Constructor => "Constructor",
            Self::Property => "Property",
            Self::Method => "Method",
            Self::Event => "Event",
            Self::Delegate => "Delegate",
            Self::Type => "Type",
            Self::Group => "Group",
            Self::RawText => "RawText",
        }
    }

    /// Whether an element of kind `other` satisfies this kind filter.
    pub fn matches(&self, other: ElementType) -> bool {
        *self == Self::NotSpecified || *self == other
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-kind payload of a [`CodeElement`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Namespace,
    Type(TypeElement),
    Field(FieldElement),
    Property(PropertyElement),
    Method(MethodElement),
    Constructor(ConstructorElement),
    Delegate(DelegateElement),
    Event(EventElement),
    Using(UsingElement),
    /// A standalone (assembly- or module-level) attribute
    Attribute(AttributeElement),
    /// A comment not attached to any declaration
    Comment(CommentElement),
    Region(RegionElement),
    ConditionDirective(ConditionDirectiveElement),
    Group(GroupElement),
    /// Source kept verbatim, e.g. `#pragma` lines or VB `Option` statements
    RawText(String),
}

/// The members that can implement interface members: methods, properties
/// and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceMember<'a> {
    Method(&'a MethodElement),
    Property(&'a PropertyElement),
    Event(&'a EventElement),
}

impl<'a> InterfaceMember<'a> {
    /// Implemented interface members, in source order.
    pub fn implements(&self) -> &'a [InterfaceReference] {
        match self {
            Self::Method(method) => &method.implements,
            Self::Property(property) => &property.implements,
            Self::Event(event) => &event.implements,
        }
    }
}

/// A node in the parsed structural representation of one source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeElement {
    pub name: String,
    pub access: CodeAccess,
    pub modifiers: Modifiers,
    pub header_comments: Vec<CommentElement>,
    pub trailing_comment: Option<CommentElement>,
    pub attributes: Vec<AttributeElement>,
    pub type_parameters: Vec<TypeParameter>,
    /// Raw body text, dedented. `None` when declared without a body.
    pub body_text: Option<String>,
    pub children: Vec<CodeElement>,
    pub kind: ElementKind,
}

impl CodeElement {
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            access: CodeAccess::None,
            modifiers: Modifiers::NONE,
            header_comments: Vec::new(),
            trailing_comment: None,
            attributes: Vec::new(),
            type_parameters: Vec::new(),
            body_text: None,
            children: Vec::new(),
            kind,
        }
    }

    pub fn namespace(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Namespace)
    }

    pub fn type_element(name: impl Into<String>, type_kind: TypeElementType) -> Self {
        Self::new(name, ElementKind::Type(TypeElement::new(type_kind)))
    }

    pub fn field(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Field(FieldElement::new(field_type)))
    }

    pub fn region(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Region(RegionElement::default()))
    }

    pub fn comment(comment: CommentElement) -> Self {
        Self::new("", ElementKind::Comment(comment))
    }

    pub fn attribute(attribute: AttributeElement) -> Self {
        Self::new(attribute.name.clone(), ElementKind::Attribute(attribute))
    }

    pub fn raw_text(text: impl Into<String>) -> Self {
        Self::new("", ElementKind::RawText(text.into()))
    }

    /// A synthetic group named after its key.
    pub fn group(key: impl Into<String>, separator: GroupSeparator, children: Vec<CodeElement>) -> Self {
        let mut group = Self::new(key, ElementKind::Group(GroupElement { separator }));
        group.children = children;
        group
    }

    pub fn with_access(mut self, access: CodeAccess) -> Self {
        self.access = access;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_children(mut self, children: Vec<CodeElement>) -> Self {
        self.children = children;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body_text = Some(body.into());
        self
    }

    pub fn element_type(&self) -> ElementType {
        match &self.kind {
            ElementKind::Namespace => ElementType::Namespace,
            ElementKind::Type(_) => ElementType::Type,
            ElementKind::Field(_) => ElementType::Field,
            ElementKind::Property(_) => ElementType::Property,
            ElementKind::Method(_) => ElementType::Method,
            ElementKind::Constructor(_) => ElementType::Constructor,
            ElementKind::Delegate(_) => ElementType::Delegate,
            ElementKind::Event(_) => ElementType::Event,
            ElementKind::Using(_) => ElementType::Using,
            ElementKind::Attribute(_) => ElementType::Attribute,
            ElementKind::Comment(_) => ElementType::Comment,
            ElementKind::Region(_) => ElementType::Region,
            ElementKind::ConditionDirective(_) => ElementType::ConditionDirective,
            ElementKind::Group(_) => ElementType::Group,
            ElementKind::RawText(_) => ElementType::RawText,
        }
    }

    /// Namespaces, types and regions: the elements whose children the
    /// arranger reorganizes.
    pub fn is_container(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Namespace | ElementKind::Type(_) | ElementKind::Region(_)
        )
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ElementKind::Group(_))
    }

    pub fn is_partial(&self) -> bool {
        self.modifiers.contains(Modifiers::PARTIAL)
    }

    pub fn interface_member(&self) -> Option<InterfaceMember<'_>> {
        match &self.kind {
            ElementKind::Method(method) => Some(InterfaceMember::Method(method)),
            ElementKind::Property(property) => Some(InterfaceMember::Property(property)),
            ElementKind::Event(event) => Some(InterfaceMember::Event(event)),
            ElementKind::Namespace
            | ElementKind::Type(_)
            | ElementKind::Field(_)
            | ElementKind::Constructor(_)
            | ElementKind::Delegate(_)
            | ElementKind::Using(_)
            | ElementKind::Attribute(_)
            | ElementKind::Comment(_)
            | ElementKind::Region(_)
            | ElementKind::ConditionDirective(_)
            | ElementKind::Group(_)
            | ElementKind::RawText(_) => None,
        }
    }

    /// The type-like text of an element: field/property/event type,
    /// method/delegate return type, or the subkind of a type declaration.
    pub fn type_text(&self) -> &str {
        match &self.kind {
            ElementKind::Type(ty) => ty.type_kind.as_str(),
            ElementKind::Field(field) => &field.field_type,
            ElementKind::Property(property) => &property.property_type,
            ElementKind::Method(method) => method.return_type.as_deref().unwrap_or(""),
            ElementKind::Delegate(delegate) => delegate.return_type.as_deref().unwrap_or(""),
            ElementKind::Event(event) => event.event_type.as_deref().unwrap_or(""),
            _ => "",
        }
    }

    /// Every child list of this element: `children` followed by the bodies
    /// of conditional branches.
    pub fn child_lists(&self) -> Vec<&[CodeElement]> {
        let mut lists = vec![self.children.as_slice()];
        if let ElementKind::ConditionDirective(directive) = &self.kind {
            lists.extend(directive.branches.iter().map(|b| b.children.as_slice()));
            if let Some(else_body) = &directive.else_body {
                lists.push(else_body.as_slice());
            }
        }
        lists
    }
}
