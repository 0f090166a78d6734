//! Regions, conditional compilation blocks and synthetic groups.

use super::CodeElement;

/// How a region is delimited in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegionStyle {
    /// `#region` / `#Region`
    #[default]
    Directive,
    /// Comment markers such as `// $(Begin) Name`
    CommentDirective,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionElement {
    pub directives_enabled: bool,
    pub style: RegionStyle,
}

impl Default for RegionElement {
    fn default() -> Self {
        Self {
            directives_enabled: true,
            style: RegionStyle::Directive,
        }
    }
}

/// One `#if` / `#elif` branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConditionBranch {
    pub condition: String,
    pub children: Vec<CodeElement>,
}

impl ConditionBranch {
    pub fn new(condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            children: Vec::new(),
        }
    }
}

/// A conditional compilation block.
///
/// `branches[0]` is the opening `#if`; later entries are `#elif` branches in
/// source order. `else_body` holds the `#else` branch, if written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConditionDirectiveElement {
    pub branches: Vec<ConditionBranch>,
    pub else_body: Option<Vec<CodeElement>>,
}

impl ConditionDirectiveElement {
    pub fn new(condition: impl Into<String>) -> Self {
        Self {
            branches: vec![ConditionBranch::new(condition)],
            else_body: None,
        }
    }

    /// Condition of the opening `#if`.
    pub fn condition_expression(&self) -> &str {
        self.branches
            .first()
            .map(|branch| branch.condition.as_str())
            .unwrap_or("")
    }
}

/// Separator written between synthetic groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupSeparator {
    /// A blank line
    #[default]
    NewLine,
    /// Custom text, written verbatim
    Custom(String),
}

/// A partition created by the arranger's GroupBy. Never produced by parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GroupElement {
    pub separator: GroupSeparator,
}
