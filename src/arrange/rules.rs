//! Compiled rule tree: a resolved configuration with conditions parsed and
//! capture patterns compiled.

use regex::Regex;

use crate::condition::{Condition, ElementAttribute};
use crate::config::{ConfigurationElement, ConfigurationError, GroupBy, SortBy, SortDirection};
use crate::elements::{CodeElement, ElementType, GroupSeparator};

#[derive(Debug, Clone)]
pub(crate) enum Rule {
    Element(ElementRule),
    Region(RegionRule),
}

#[derive(Debug, Clone)]
pub(crate) struct ElementRule {
    pub element_type: ElementType,
    pub filter: Option<Condition>,
    pub group_by: Option<GroupRule>,
    pub sort_by: Option<SortBy>,
    pub children: Vec<Rule>,
}

#[derive(Debug, Clone)]
pub(crate) struct GroupRule {
    pub by: ElementAttribute,
    pub capture: Option<Regex>,
    pub direction: SortDirection,
    pub separator: GroupSeparator,
    pub inner: Option<Box<GroupRule>>,
}

#[derive(Debug, Clone)]
pub(crate) struct RegionRule {
    pub name: String,
    pub directives_enabled: bool,
    pub children: Vec<Rule>,
}

impl GroupRule {
    fn compile(group_by: &GroupBy) -> Result<Self, ConfigurationError> {
        let capture = group_by
            .attribute_capture
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|err| ConfigurationError::InvalidCapture {
                    pattern: pattern.to_string(),
                    reason: err.to_string(),
                })
            })
            .transpose()?;
        let inner = match &group_by.inner {
            Some(inner) => Some(Box::new(Self::compile(inner)?)),
            None => None,
        };
        Ok(Self {
            by: group_by.by,
            capture,
            direction: group_by.direction,
            separator: group_by.separator.clone(),
            inner,
        })
    }

    /// Partition key of `element`: the first capture group of the pattern,
    /// the whole match when it has none, the full value when it does not
    /// match.
    pub fn key(&self, element: &CodeElement) -> String {
        let value = self.by.value(element);
        let Some(capture) = &self.capture else {
            return value.into_owned();
        };
        capture
            .captures(&value)
            .and_then(|found| found.get(1).or_else(|| found.get(0)))
            .map(|found| found.as_str().to_string())
            .unwrap_or_else(|| value.to_string())
    }
}

/// Compile a reference-free configuration tree.
pub(crate) fn compile(elements: &[ConfigurationElement]) -> Result<Vec<Rule>, ConfigurationError> {
    elements.iter().map(compile_node).collect()
}

fn compile_node(node: &ConfigurationElement) -> Result<Rule, ConfigurationError> {
    match node {
        ConfigurationElement::Element(element) => {
            let filter = element
                .filter_by
                .as_ref()
                .map(|filter| Condition::parse(&filter.condition))
                .transpose()?;
            let group_by = element.group_by.as_ref().map(GroupRule::compile).transpose()?;
            Ok(Rule::Element(ElementRule {
                element_type: element.element_type,
                filter,
                group_by,
                sort_by: element.sort_by.clone(),
                children: compile(&element.elements)?,
            }))
        }
        ConfigurationElement::Region(region) => Ok(Rule::Region(RegionRule {
            name: region.name.clone(),
            directives_enabled: region.directives_enabled,
            children: compile(&region.elements)?,
        })),
        ConfigurationElement::Reference(reference) => Err(ConfigurationError::UnresolvedReference {
            id: reference.id.clone(),
        }),
    }
}
