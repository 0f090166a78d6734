//! Condition expression trees.

use std::fmt;

use super::attributes::{ElementAttribute, FileAttribute};

/// `$(Name)` or `$(File.Name)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeReference {
    Element(ElementAttribute),
    File(FileAttribute),
}

/// A leaf: the only thing a comparison may compare.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    Literal(String),
    Attribute(AttributeReference),
}

impl Operand {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn element(attribute: ElementAttribute) -> Self {
        Self::Attribute(AttributeReference::Element(attribute))
    }

    pub fn file(attribute: FileAttribute) -> Self {
        Self::Attribute(AttributeReference::File(attribute))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `:` substring containment
    Contains,
    /// `=~` regular expression match
    Matches,
}

impl ComparisonOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Contains => ":",
            Self::Matches => "=~",
        }
    }
}

/// A parsed condition.
///
/// Comparisons hold leaves only; `And`, `Or` and `Not` hold conditions
/// only, so a malformed mix cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    Comparison {
        operator: ComparisonOperator,
        left: Operand,
        right: Operand,
    },
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Not(Box<Expression>),
}

impl Expression {
    pub fn compare(operator: ComparisonOperator, left: Operand, right: Operand) -> Self {
        Self::Comparison {
            operator,
            left,
            right,
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    pub fn not(inner: Expression) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Binding strength: comparisons and negations bind tightest.
    fn precedence(&self) -> u8 {
        match self {
            Self::Or(..) => 1,
            Self::And(..) => 2,
            Self::Comparison { .. } | Self::Not(_) => 3,
        }
    }

    fn fmt_operand(
        &self,
        f: &mut fmt::Formatter<'_>,
        operand: &Expression,
        right: bool,
    ) -> fmt::Result {
        let own = self.precedence();
        let inner = operand.precedence();
        // Binary operators are left-associative, so an equal-precedence
        // right operand keeps its parentheses.
        if inner < own || (right && inner == own) {
            write!(f, "({operand})")
        } else {
            write!(f, "{operand}")
        }
    }
}

impl fmt::Display for AttributeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(attribute) => write!(f, "$({attribute})"),
            Self::File(attribute) => write!(f, "$(File.{attribute})"),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "'{}'", text.replace('\'', "''")),
            Self::Attribute(reference) => write!(f, "{reference}"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comparison {
                operator,
                left,
                right,
            } => write!(f, "{left} {} {right}", operator.symbol()),
            Self::And(left, right) | Self::Or(left, right) => {
                let keyword = if matches!(self, Self::And(..)) { "And" } else { "Or" };
                self.fmt_operand(f, left, false)?;
                write!(f, " {keyword} ")?;
                self.fmt_operand(f, right, true)
            }
            Self::Not(inner) => write!(f, "!({inner})"),
        }
    }
}
