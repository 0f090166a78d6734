//! Kind-specific payloads for types and members.

/// Subkind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeElementType {
    #[default]
    Class,
    Structure,
    Interface,
    Enum,
    /// VB `Module`
    Module,
}

impl TypeElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::Structure => "Structure",
            Self::Interface => "Interface",
            Self::Enum => "Enum",
            Self::Module => "Module",
        }
    }
}

/// How a base type or interface was referenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterfaceReferenceType {
    /// The language does not say (C# base lists, enum underlying types)
    #[default]
    None,
    /// VB `Inherits`
    Class,
    /// VB `Implements`, or an implemented interface member
    Interface,
}

/// A base type, implemented interface, or implemented interface member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InterfaceReference {
    pub name: String,
    pub reference_type: InterfaceReferenceType,
}

impl InterfaceReference {
    pub fn new(name: impl Into<String>, reference_type: InterfaceReferenceType) -> Self {
        Self {
            name: name.into(),
            reference_type,
        }
    }
}

/// A generic type parameter and its constraints, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParameter {
    pub name: String,
    pub constraints: Vec<String>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
        }
    }

    pub fn with_constraints<I, S>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints = constraints.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TypeElement {
    pub type_kind: TypeElementType,
    pub interfaces: Vec<InterfaceReference>,
}

impl TypeElement {
    pub fn new(type_kind: TypeElementType) -> Self {
        Self {
            type_kind,
            interfaces: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldElement {
    pub field_type: String,
    pub initial_value: Option<String>,
    /// VB field declared with `Dim`
    pub declared_with_dim: bool,
    /// VB `WithEvents` field
    pub with_events: bool,
}

impl FieldElement {
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            ..Self::default()
        }
    }

    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertyElement {
    pub property_type: String,
    /// Raw parameter text of an indexer / parameterized property
    pub index_parameter: Option<String>,
    pub implements: Vec<InterfaceReference>,
    /// VB `Default` property
    pub is_default: bool,
    /// C# `this[...]` indexer
    pub is_indexer: bool,
    /// Auto-property initializer
    pub initial_value: Option<String>,
}

impl PropertyElement {
    pub fn new(property_type: impl Into<String>) -> Self {
        Self {
            property_type: property_type.into(),
            ..Self::default()
        }
    }
}

/// Conversion kind of an operator declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperatorType {
    #[default]
    None,
    /// C# `implicit`, VB `Widening`
    Implicit,
    /// C# `explicit`, VB `Narrowing`
    Explicit,
}

/// External (`extern` / VB `Declare`) method binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ExternalMethod {
    /// Library named by `Lib "..."`, without quotes
    pub library: Option<String>,
    /// Entry point named by `Alias "..."`, without quotes
    pub alias: Option<String>,
    /// Character set modifier (`Ansi`, `Unicode`, `Auto`)
    pub charset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MethodElement {
    /// `None` for VB `Sub` declarations
    pub return_type: Option<String>,
    /// Raw parameter list text without the enclosing parentheses
    pub parameters: String,
    pub is_operator: bool,
    pub operator_type: OperatorType,
    pub implements: Vec<InterfaceReference>,
    /// VB `Handles` clause, in source order
    pub handles: Vec<String>,
    pub external: Option<ExternalMethod>,
}

impl MethodElement {
    pub fn new(return_type: Option<String>, parameters: impl Into<String>) -> Self {
        Self {
            return_type,
            parameters: parameters.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ConstructorElement {
    pub parameters: String,
    /// `base(...)` / `this(...)` initializer call
    pub reference: Option<String>,
}

impl ConstructorElement {
    pub fn new(parameters: impl Into<String>) -> Self {
        Self {
            parameters: parameters.into(),
            reference: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DelegateElement {
    pub return_type: Option<String>,
    pub parameters: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EventElement {
    pub event_type: Option<String>,
    /// VB events declared with a parameter list instead of a delegate type
    pub parameters: Option<String>,
    pub implements: Vec<InterfaceReference>,
    /// VB `Custom Event` with accessor blocks
    pub is_custom: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct UsingElement {
    /// Alias declared by an alias directive (`using A = B.C;` stores `A`)
    pub redefine: Option<String>,
    /// Whether the directive may be moved between file and namespace scope
    pub is_movable: bool,
}
