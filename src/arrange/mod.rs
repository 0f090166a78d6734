//! Arrangement engine: rebuilds an element tree according to a rule tree.
//!
//! Each level of the tree is arranged on its own:
//!
//! 1. Synthetic groups, and source regions named like a configured region,
//!    are dissolved into the level's pool.
//! 2. Rules run in order. An element rule claims every unclaimed element of
//!    its kind that passes its filter; a region rule runs its nested rules
//!    and wraps what they claim.
//! 3. Each bucket is grouped and sorted, and claimed containers are
//!    arranged recursively with the rule's nested rules (or, without any,
//!    the rules of the current level).
//! 4. Elements no rule claimed follow the buckets in source order. Elements
//!    a filter rejected that no later rule claimed are dropped.
//!
//! The input tree is never modified.

mod order;
mod rules;


use std::mem;

use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::condition::FileContext;
use crate::config::{ArrangeConfiguration, ConfigurationError, resolve};
use crate::elements::{CodeElement, ElementKind, RegionElement, count_elements};
use rules::{ElementRule, Rule};

/// A compiled arrangement configuration.
///
/// Building one resolves references and compiles every condition and
/// pattern; arranging never fails afterwards. An `Arranger` is immutable and
/// can be shared across threads.
#[derive(Debug, Clone)]
pub struct Arranger {
    rules: Vec<Rule>,
}

impl Arranger {
    pub fn new(config: &ArrangeConfiguration) -> Result<Self, ConfigurationError> {
        let resolved = resolve(config)?;
        let rules = rules::compile(&resolved)?;
        debug!(rules = rules.len(), "compiled arrangement configuration");
        Ok(Self { rules })
    }

    /// Arrange the top-level elements of one file.
    pub fn arrange(&self, elements: &[CodeElement], file: &FileContext) -> Vec<CodeElement> {
        let arranged = arrange_level(&self.rules, elements.to_vec(), file);
        debug!(
            file = %file.path.display(),
            before = count_elements(elements, |_| true),
            after = count_elements(&arranged, |_| true),
            "arranged elements"
        );
        arranged
    }
}

/// Unclaimed elements of one level. A slot is `None` once claimed.
struct Pool {
    slots: Vec<Option<CodeElement>>,
    /// Set when a filter rejected the element
    rejected: Vec<bool>,
}

fn arrange_level(rules: &[Rule], elements: Vec<CodeElement>, file: &FileContext) -> Vec<CodeElement> {
    let mut region_names = FxHashSet::default();
    collect_region_names(rules, &mut region_names);
    let mut flat = Vec::with_capacity(elements.len());
    dissolve(elements, &region_names, &mut flat);

    let mut pool = Pool {
        rejected: vec![false; flat.len()],
        slots: flat.into_iter().map(Some).collect(),
    };
    let mut arranged = apply_rules(rules, rules, &mut pool, file);
    for (slot, rejected) in pool.slots.into_iter().zip(pool.rejected) {
        let Some(element) = slot else {
            continue;
        };
        if rejected {
            debug!(
                element = %element.name,
                kind = %element.element_type(),
                "dropped element rejected by every matching filter"
            );
        } else {
            arranged.push(element);
        }
    }
    arranged
}

/// Names of the regions configured at this level, including regions
/// nested in regions.
fn collect_region_names<'r>(rules: &'r [Rule], names: &mut FxHashSet<&'r str>) {
    for rule in rules {
        if let Rule::Region(region) = rule {
            names.insert(region.name.as_str());
            collect_region_names(&region.children, names);
        }
    }
}

fn dissolve(elements: Vec<CodeElement>, region_names: &FxHashSet<&str>, out: &mut Vec<CodeElement>) {
    for mut element in elements {
        let configured_region = matches!(element.kind, ElementKind::Region(_))
            && region_names.contains(element.name.as_str());
        if !element.is_group() && !configured_region {
            out.push(element);
            continue;
        }
        trace!(name = %element.name, kind = %element.element_type(), "dissolve");
        let mut children = mem::take(&mut element.children);
        let comments = mem::take(&mut element.header_comments);
        match children.first_mut() {
            Some(first) => {
                first.header_comments.splice(0..0, comments);
            }
            None => out.extend(comments.into_iter().map(CodeElement::comment)),
        }
        dissolve(children, region_names, out);
    }
}

/// Run `rules` against the pool. `level` holds the rules of the whole level,
/// used for containers claimed by rules without nested rules.
fn apply_rules(rules: &[Rule], level: &[Rule], pool: &mut Pool, file: &FileContext) -> Vec<CodeElement> {
    let mut arranged = Vec::new();
    for rule in rules {
        match rule {
            Rule::Element(rule) => arranged.extend(apply_element_rule(rule, level, pool, file)),
            Rule::Region(region) => {
                let children = apply_rules(&region.children, level, pool, file);
                if children.is_empty() {
                    continue;
                }
                let mut element = CodeElement::new(
                    region.name.clone(),
                    ElementKind::Region(RegionElement {
                        directives_enabled: region.directives_enabled,
                        ..RegionElement::default()
                    }),
                );
                element.children = children;
                arranged.push(element);
            }
        }
    }
    arranged
}

fn apply_element_rule(
    rule: &ElementRule,
    level: &[Rule],
    pool: &mut Pool,
    file: &FileContext,
) -> Vec<CodeElement> {
    let mut bucket = Vec::new();
    for index in 0..pool.slots.len() {
        let Some(element) = pool.slots[index].as_ref() else {
            continue;
        };
        if !rule.element_type.matches(element.element_type()) {
            continue;
        }
        if rule
            .filter
            .as_ref()
            .is_some_and(|filter| !filter.evaluate(element, file))
        {
            pool.rejected[index] = true;
            continue;
        }
        bucket.extend(pool.slots[index].take());
    }
    trace!(kind = %rule.element_type, claimed = bucket.len(), "bucket");

    let child_rules = if rule.children.is_empty() {
        level
    } else {
        &rule.children
    };
    for element in &mut bucket {
        if element.is_container() {
            let children = mem::take(&mut element.children);
            element.children = arrange_level(child_rules, children, file);
        }
    }

    match &rule.group_by {
        Some(group_by) => order::group(bucket, group_by, rule.sort_by.as_ref()),
        None => {
            order::sort(&mut bucket, rule.sort_by.as_ref());
            bucket
        }
    }
}
