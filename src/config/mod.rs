//! Arrangement configuration: the rule tree the arranger applies.
//!
//! ```text
//! ArrangeConfiguration
//!  └─ ConfigurationElement*
//!      ├─ Element   kind filter, FilterBy, GroupBy, SortBy, nested nodes
//!      ├─ Region    wraps what its nested nodes claim in a region
//!      └─ Reference reuses the Element node with the given id
//! ```
//!
//! Configuration values are plain data. Loading them from a file is the
//! caller's business; with the `serde` feature they derive
//! `Serialize`/`Deserialize`.

mod error;
mod resolve;

pub use error::ConfigurationError;
pub use resolve::resolve;

use crate::condition::ElementAttribute;
use crate::elements::{ElementType, GroupSeparator};

/// Root of an arrangement configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrangeConfiguration {
    pub elements: Vec<ConfigurationElement>,
}

impl ArrangeConfiguration {
    pub fn new(elements: Vec<ConfigurationElement>) -> Self {
        Self { elements }
    }

    /// A conventional member layout: usings, then namespaces, then types
    /// whose members are grouped into regions by kind.
    pub fn standard() -> Self {
        let by_name = SortBy::new(ElementAttribute::Name, SortDirection::Ascending);
        let by_access = SortBy::new(ElementAttribute::Access, SortDirection::Descending)
            .then(by_name.clone());
        let member_region = |name: &str, element_type: ElementType| {
            ConfigurationElement::region(
                name,
                vec![ConfigurationElement::element(
                    ElementConfiguration::new(element_type).with_sort_by(by_access.clone()),
                )],
            )
        };
        let members = vec![
            member_region("Fields", ElementType::Field),
            member_region("Constructors", ElementType::Constructor),
            member_region("Delegates", ElementType::Delegate),
            member_region("Events", ElementType::Event),
            member_region("Properties", ElementType::Property),
            member_region("Methods", ElementType::Method),
            member_region("Nested Types", ElementType::Type),
        ];
        Self::new(vec![
            ConfigurationElement::element(
                ElementConfiguration::new(ElementType::Using)
                    .with_group_by(GroupBy::new(ElementAttribute::Name).with_capture(r"^(\w+)"))
                    .with_sort_by(by_name.clone()),
            ),
            ConfigurationElement::element(
                ElementConfiguration::new(ElementType::Namespace).with_sort_by(by_name.clone()),
            ),
            ConfigurationElement::element(
                ElementConfiguration::new(ElementType::Type)
                    .with_id("Types")
                    .with_sort_by(by_name)
                    .with_elements(members),
            ),
        ])
    }
}

/// One node of the rule tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigurationElement {
    Element(ElementConfiguration),
    Region(RegionConfiguration),
    Reference(ElementReference),
}

impl ConfigurationElement {
    pub fn element(config: ElementConfiguration) -> Self {
        Self::Element(config)
    }

    pub fn region(name: impl Into<String>, elements: Vec<ConfigurationElement>) -> Self {
        Self::Region(RegionConfiguration::new(name).with_elements(elements))
    }

    pub fn reference(id: impl Into<String>) -> Self {
        Self::Reference(ElementReference { id: id.into() })
    }

    /// Nodes nested under this one.
    pub fn elements(&self) -> &[ConfigurationElement] {
        match self {
            Self::Element(element) => &element.elements,
            Self::Region(region) => &region.elements,
            Self::Reference(_) => &[],
        }
    }
}

/// Claims elements of one kind (every kind for `NotSpecified`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementConfiguration {
    /// Target of [`ElementReference`]s
    pub id: Option<String>,
    pub element_type: ElementType,
    pub filter_by: Option<FilterBy>,
    pub group_by: Option<GroupBy>,
    pub sort_by: Option<SortBy>,
    /// Rules for the children of claimed containers
    pub elements: Vec<ConfigurationElement>,
}

impl ElementConfiguration {
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            ..Self::default()
        }
    }

    /// A catch-all node.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_filter(mut self, condition: impl Into<String>) -> Self {
        self.filter_by = Some(FilterBy::new(condition));
        self
    }

    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    pub fn with_elements(mut self, elements: Vec<ConfigurationElement>) -> Self {
        self.elements = elements;
        self
    }
}

/// Wraps the elements its nested nodes claim in a region named `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionConfiguration {
    pub name: String,
    /// Whether the writer emits region directives for this region
    pub directives_enabled: bool,
    pub elements: Vec<ConfigurationElement>,
}

impl RegionConfiguration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directives_enabled: true,
            elements: Vec::new(),
        }
    }

    pub fn with_elements(mut self, elements: Vec<ConfigurationElement>) -> Self {
        self.elements = elements;
        self
    }

    pub fn without_directives(mut self) -> Self {
        self.directives_enabled = false;
        self
    }
}

/// Stands in for the [`ElementConfiguration`] whose id is `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementReference {
    pub id: String,
}

/// Keeps only the claimed elements satisfying a condition expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterBy {
    pub condition: String,
}

impl FilterBy {
    pub fn new(condition: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortDirection {
    /// Keep source (first-seen) order
    None,
    #[default]
    Ascending,
    Descending,
}

/// Partitions claimed elements by an attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupBy {
    pub by: ElementAttribute,
    /// Regular expression narrowing the value to its first capture group
    pub attribute_capture: Option<String>,
    /// Order of the groups
    pub direction: SortDirection,
    pub separator: GroupSeparator,
    /// Partitions each group again
    pub inner: Option<Box<GroupBy>>,
}

impl GroupBy {
    pub fn new(by: ElementAttribute) -> Self {
        Self {
            by,
            ..Self::default()
        }
    }

    pub fn with_capture(mut self, pattern: impl Into<String>) -> Self {
        self.attribute_capture = Some(pattern.into());
        self
    }

    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_separator(mut self, separator: GroupSeparator) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_inner(mut self, inner: GroupBy) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }
}

/// Orders claimed elements by an attribute, with an optional tie-breaker.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SortBy {
    pub by: ElementAttribute,
    pub direction: SortDirection,
    pub inner: Option<Box<SortBy>>,
}

impl SortBy {
    pub fn new(by: ElementAttribute, direction: SortDirection) -> Self {
        Self {
            by,
            direction,
            inner: None,
        }
    }

    /// Break ties with `inner`.
    pub fn then(mut self, inner: SortBy) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }
}
