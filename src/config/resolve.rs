//! Replacement of element references by the nodes they name.

use rustc_hash::FxHashMap;
use tracing::warn;

use super::{ArrangeConfiguration, ConfigurationElement, ConfigurationError, ElementConfiguration};

/// Resolve every [`ElementReference`](super::ElementReference) in `config`,
/// returning a rule tree without references.
///
/// A reference is replaced by a copy of the element node carrying its id,
/// with that node's own references resolved in turn. A reference to an
/// unknown id, or one reached again while it is being resolved, is an error.
pub fn resolve(
    config: &ArrangeConfiguration,
) -> Result<Vec<ConfigurationElement>, ConfigurationError> {
    let mut ids = FxHashMap::default();
    collect_ids(&config.elements, &mut ids);
    let mut resolver = Resolver {
        ids,
        stack: Vec::new(),
    };
    resolver.resolve_list(&config.elements)
}

fn collect_ids<'c>(
    elements: &'c [ConfigurationElement],
    ids: &mut FxHashMap<&'c str, &'c ElementConfiguration>,
) {
    for node in elements {
        if let ConfigurationElement::Element(element) = node {
            if let Some(id) = element.id.as_deref() {
                if ids.contains_key(id) {
                    warn!(id, "duplicate element id; the first declaration wins");
                } else {
                    ids.insert(id, element);
                }
            }
        }
        collect_ids(node.elements(), ids);
    }
}

struct Resolver<'c> {
    ids: FxHashMap<&'c str, &'c ElementConfiguration>,
    /// Ids of the element nodes being resolved, outermost first
    stack: Vec<&'c str>,
}

impl<'c> Resolver<'c> {
    fn resolve_list(
        &mut self,
        elements: &'c [ConfigurationElement],
    ) -> Result<Vec<ConfigurationElement>, ConfigurationError> {
        elements.iter().map(|node| self.resolve_node(node)).collect()
    }

    fn resolve_node(
        &mut self,
        node: &'c ConfigurationElement,
    ) -> Result<ConfigurationElement, ConfigurationError> {
        match node {
            ConfigurationElement::Element(element) => {
                self.resolve_element(element).map(ConfigurationElement::Element)
            }
            ConfigurationElement::Region(region) => {
                let mut resolved = region.clone();
                resolved.elements = self.resolve_list(&region.elements)?;
                Ok(ConfigurationElement::Region(resolved))
            }
            ConfigurationElement::Reference(reference) => {
                let id = reference.id.as_str();
                let Some(&target) = self.ids.get(id) else {
                    return Err(ConfigurationError::UnresolvedReference { id: id.to_string() });
                };
                if self.stack.contains(&id) {
                    return Err(ConfigurationError::CircularReference { id: id.to_string() });
                }
                self.resolve_element(target).map(ConfigurationElement::Element)
            }
        }
    }

    fn resolve_element(
        &mut self,
        element: &'c ElementConfiguration,
    ) -> Result<ElementConfiguration, ConfigurationError> {
        let id = element.id.as_deref();
        if let Some(id) = id {
            self.stack.push(id);
        }
        let children = self.resolve_list(&element.elements);
        if id.is_some() {
            self.stack.pop();
        }
        Ok(ElementConfiguration {
            elements: children?,
            ..element.clone()
        })
    }
}
