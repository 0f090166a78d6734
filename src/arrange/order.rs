//! GroupBy partitioning and SortBy ordering of a claimed bucket.

use std::cmp::Ordering;

use indexmap::IndexMap;

use super::rules::GroupRule;
use crate::condition::ElementAttribute;
use crate::config::{SortBy, SortDirection};
use crate::elements::CodeElement;

/// Case-insensitive text order, ordinal on ties.
pub(crate) fn compare_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

fn compare_by(by: ElementAttribute, a: &CodeElement, b: &CodeElement) -> Ordering {
    match by {
        ElementAttribute::Access => a.access.rank().cmp(&b.access.rank()),
        _ => compare_text(&by.value(a), &by.value(b)),
    }
}

fn compare(sort: &SortBy, a: &CodeElement, b: &CodeElement) -> Ordering {
    let primary = match sort.direction {
        SortDirection::None => Ordering::Equal,
        SortDirection::Ascending => compare_by(sort.by, a, b),
        SortDirection::Descending => compare_by(sort.by, b, a),
    };
    primary.then_with(|| {
        sort.inner
            .as_deref()
            .map_or(Ordering::Equal, |inner| compare(inner, a, b))
    })
}

/// Stable sort; equal elements keep their relative order.
pub(crate) fn sort(elements: &mut [CodeElement], sort_by: Option<&SortBy>) {
    if let Some(sort_by) = sort_by {
        elements.sort_by(|a, b| compare(sort_by, a, b));
    }
}

/// Partition `elements` into synthetic groups, sorting each innermost
/// partition by `sort_by`.
pub(crate) fn group(
    elements: Vec<CodeElement>,
    rule: &GroupRule,
    sort_by: Option<&SortBy>,
) -> Vec<CodeElement> {
    let mut partitions: IndexMap<String, Vec<CodeElement>> = IndexMap::new();
    for element in elements {
        partitions.entry(rule.key(&element)).or_default().push(element);
    }
    let order = |k1: &String, v1: &Vec<CodeElement>, k2: &String, v2: &Vec<CodeElement>| {
        match (rule.by, v1.first(), v2.first()) {
            (ElementAttribute::Access, Some(a), Some(b)) => a.access.rank().cmp(&b.access.rank()),
            _ => compare_text(k1, k2),
        }
    };
    match rule.direction {
        SortDirection::None => {}
        SortDirection::Ascending => partitions.sort_by(|k1, v1, k2, v2| order(k1, v1, k2, v2)),
        SortDirection::Descending => partitions.sort_by(|k1, v1, k2, v2| order(k2, v2, k1, v1)),
    }
    partitions
        .into_iter()
        .map(|(key, mut members)| {
            let children = match &rule.inner {
                Some(inner) => group(members, inner, sort_by),
                None => {
                    sort(&mut members, sort_by);
                    members
                }
            };
            CodeElement::group(key, rule.separator.clone(), children)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{CodeAccess, GroupSeparator};

    fn field(name: &str, access: CodeAccess) -> CodeElement {
        CodeElement::field(name, "int").with_access(access)
    }

    fn names(elements: &[CodeElement]) -> Vec<&str> {
        elements.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_compare_text_ignores_case_then_ordinal() {
        assert_eq!(compare_text("alpha", "Beta"), Ordering::Less);
        assert_eq!(compare_text("Beta", "beta"), Ordering::Less);
        assert_eq!(compare_text("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_sort_by_access_rank_then_name() {
        let mut elements = vec![
            field("b", CodeAccess::Private),
            field("c", CodeAccess::Public),
            field("a", CodeAccess::Private),
            field("d", CodeAccess::Internal),
        ];
        let sort_by = SortBy::new(ElementAttribute::Access, SortDirection::Descending)
            .then(SortBy::new(ElementAttribute::Name, SortDirection::Ascending));
        sort(&mut elements, Some(&sort_by));
        assert_eq!(names(&elements), ["c", "d", "a", "b"]);
    }

    #[test]
    fn test_sort_direction_none_keeps_order() {
        let mut elements = vec![field("b", CodeAccess::None), field("a", CodeAccess::None)];
        sort(
            &mut elements,
            Some(&SortBy::new(ElementAttribute::Name, SortDirection::None)),
        );
        assert_eq!(names(&elements), ["b", "a"]);
    }

    #[test]
    fn test_nested_groups() {
        let rule = GroupRule {
            by: ElementAttribute::Access,
            capture: None,
            direction: SortDirection::Descending,
            separator: GroupSeparator::NewLine,
            inner: Some(Box::new(GroupRule {
                by: ElementAttribute::Name,
                capture: regex::Regex::new("^(.)").ok(),
                direction: SortDirection::None,
                separator: GroupSeparator::Custom("// --".into()),
                inner: None,
            })),
        };
        let elements = vec![
            field("beta", CodeAccess::Private),
            field("alpha", CodeAccess::Public),
            field("bravo", CodeAccess::Private),
            field("apple", CodeAccess::Private),
        ];
        let groups = group(elements, &rule, None);
        assert_eq!(names(&groups), ["Public", "Private"]);
        assert_eq!(names(&groups[1].children), ["b", "a"]);
        assert_eq!(names(&groups[1].children[0].children), ["beta", "bravo"]);
    }
}
