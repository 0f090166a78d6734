//! Parse context tracking for context-aware error messages
//!
//! The parsers record where in the source structure they are, so that an
//! error can say "in type body" rather than only pointing at a position.

/// Represents the current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParseContext {
    /// At the top level of a file
    #[default]
    TopLevel,
    /// Inside a namespace body
    NamespaceBody,
    /// Inside a type body
    TypeBody,
    /// Capturing a member body
    MemberBody,
    /// Inside an open region
    Region,
    /// Inside an open conditional compilation block
    ConditionalBlock,
    /// Reading a declaration head
    Declaration,
    /// Reading an attribute list
    AttributeList,
    /// Reading a generic type parameter list
    TypeParameterList,
    /// Reading a parameter list
    ParameterList,
    /// Reading a preprocessor directive
    Directive,
}

impl ParseContext {
    /// Get a human-readable description of this context for error messages
    pub fn description(&self) -> &'static str {
        match self {
            Self::TopLevel => "at top level",
            Self::NamespaceBody => "in namespace body",
            Self::TypeBody => "in type body",
            Self::MemberBody => "in member body",
            Self::Region => "in region",
            Self::ConditionalBlock => "in conditional block",
            Self::Declaration => "in declaration",
            Self::AttributeList => "in attribute list",
            Self::TypeParameterList => "in type parameter list",
            Self::ParameterList => "in parameter list",
            Self::Directive => "in directive",
        }
    }

    /// Get a description of what is expected in this context
    pub fn expected_description(&self) -> &'static str {
        match self {
            Self::TopLevel => "a namespace, type, using/imports directive, or attribute",
            Self::NamespaceBody => "a namespace, type, or using/imports directive",
            Self::TypeBody => "a member declaration (field, property, method, etc.)",
            Self::MemberBody => "the end of the member body",
            Self::Region => "elements or the end region directive",
            Self::ConditionalBlock => "elements or the end conditional directive",
            Self::Declaration => "a name, type, or parameter list",
            Self::AttributeList => "an attribute name",
            Self::TypeParameterList => "a type parameter name",
            Self::ParameterList => "a parameter",
            Self::Directive => "a directive name",
        }
    }

    /// Check if this context holds declarations (rather than raw text)
    pub fn is_declaration_scope(&self) -> bool {
        matches!(
            self,
            Self::TopLevel
                | Self::NamespaceBody
                | Self::TypeBody
                | Self::Region
                | Self::ConditionalBlock
        )
    }
}
