//! Condition expressions used by FilterBy.
//!
//! ```text
//! $(Access) == 'Public' And !($(Name) : 'Test')
//! $(File.Name) =~ '\.Designer\.cs$' Or $(Element.Type) == 'int'
//! ```
//!
//! Text is tokenized by a logos lexer and parsed by a recursive-descent
//! parser into an [`Expression`]. A [`Condition`] is the compiled form:
//! `=~` patterns written as literals are compiled once, so evaluation never
//! fails.

mod ast;
mod attributes;
mod lexer;
mod parser;

#[cfg(test)]
mod tests;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use regex::Regex;
use tracing::trace;

pub use ast::{AttributeReference, ComparisonOperator, Expression, Operand};
pub use attributes::{ElementAttribute, FileAttribute, FileContext};
pub use parser::parse_expression;

use crate::config::ConfigurationError;
use crate::elements::CodeElement;

/// A compiled, immutable condition. Cheap to share across threads.
#[derive(Debug, Clone)]
pub struct Condition {
    expression: Expression,
    node: Node,
}

#[derive(Debug, Clone)]
enum Node {
    Compare {
        operator: ComparisonOperator,
        left: Operand,
        right: Operand,
    },
    Matches {
        subject: Operand,
        pattern: Pattern,
    },
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Not(Box<Node>),
}

#[derive(Debug, Clone)]
enum Pattern {
    Compiled(Regex),
    /// Pattern read from an attribute; compiled per evaluation
    Dynamic(Operand),
}

impl Condition {
    /// Parse and compile condition text.
    pub fn parse(source: &str) -> Result<Self, ConfigurationError> {
        let expression = parse_expression(source)?;
        let node = compile(&expression, source)?;
        Ok(Self { expression, node })
    }

    /// Compile an already built expression.
    pub fn compile(expression: Expression) -> Result<Self, ConfigurationError> {
        let node = compile(&expression, &expression.to_string())?;
        Ok(Self { expression, node })
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Whether `element`, declared in `file`, satisfies the condition.
    pub fn evaluate(&self, element: &CodeElement, file: &FileContext) -> bool {
        let result = evaluate(&self.node, element, file);
        trace!(condition = %self.expression, element = %element.name, result, "evaluate");
        result
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression
    }
}

impl Eq for Condition {}

impl FromStr for Condition {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

fn compile(expression: &Expression, source: &str) -> Result<Node, ConfigurationError> {
    Ok(match expression {
        Expression::Comparison {
            operator: ComparisonOperator::Matches,
            left,
            right,
        } => {
            let pattern = match right {
                Operand::Literal(pattern) => Pattern::Compiled(Regex::new(pattern).map_err(
                    |err| {
                        ConfigurationError::format(
                            source,
                            format!("invalid pattern '{pattern}': {err}"),
                        )
                    },
                )?),
                Operand::Attribute(_) => Pattern::Dynamic(right.clone()),
            };
            Node::Matches {
                subject: left.clone(),
                pattern,
            }
        }
        Expression::Comparison {
            operator,
            left,
            right,
        } => Node::Compare {
            operator: *operator,
            left: left.clone(),
            right: right.clone(),
        },
        Expression::And(left, right) => Node::And(
            Box::new(compile(left, source)?),
            Box::new(compile(right, source)?),
        ),
        Expression::Or(left, right) => Node::Or(
            Box::new(compile(left, source)?),
            Box::new(compile(right, source)?),
        ),
        Expression::Not(inner) => Node::Not(Box::new(compile(inner, source)?)),
    })
}

fn operand_value<'a>(
    operand: &'a Operand,
    element: &'a CodeElement,
    file: &'a FileContext,
) -> Cow<'a, str> {
    match operand {
        Operand::Literal(text) => Cow::Borrowed(text.as_str()),
        Operand::Attribute(AttributeReference::Element(attribute)) => attribute.value(element),
        Operand::Attribute(AttributeReference::File(attribute)) => attribute.value(file),
    }
}

fn evaluate(node: &Node, element: &CodeElement, file: &FileContext) -> bool {
    match node {
        Node::Compare {
            operator,
            left,
            right,
        } => {
            let left = operand_value(left, element, file);
            let right = operand_value(right, element, file);
            match operator {
                ComparisonOperator::Equal => left == right,
                ComparisonOperator::NotEqual => left != right,
                ComparisonOperator::Contains => left.contains(right.as_ref()),
                // Compiled as `Node::Matches`
                ComparisonOperator::Matches => false,
            }
        }
        Node::Matches { subject, pattern } => {
            let subject = operand_value(subject, element, file);
            match pattern {
                Pattern::Compiled(regex) => regex.is_match(&subject),
                Pattern::Dynamic(operand) => {
                    Regex::new(&operand_value(operand, element, file))
                        .is_ok_and(|regex| regex.is_match(&subject))
                }
            }
        }
        Node::And(left, right) => evaluate(left, element, file) && evaluate(right, element, file),
        Node::Or(left, right) => evaluate(left, element, file) || evaluate(right, element, file),
        Node::Not(inner) => !evaluate(inner, element, file),
    }
}
