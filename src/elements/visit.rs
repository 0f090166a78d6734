//! Depth-first traversal with ancestor context.

use super::CodeElement;

/// Visit every element depth-first in source order.
///
/// The callback receives the element and its ancestors, outermost first;
/// the last ancestor is the element's parent. Bodies of conditional
/// branches are visited as children of their directive.
pub fn walk<'a, F>(elements: &'a [CodeElement], visit: &mut F)
where
    F: FnMut(&'a CodeElement, &[&'a CodeElement]),
{
    let mut ancestors = Vec::new();
    walk_level(elements, &mut ancestors, visit);
}

fn walk_level<'a, F>(
    elements: &'a [CodeElement],
    ancestors: &mut Vec<&'a CodeElement>,
    visit: &mut F,
) where
    F: FnMut(&'a CodeElement, &[&'a CodeElement]),
{
    for element in elements {
        visit(element, &ancestors[..]);
        ancestors.push(element);
        for list in element.child_lists() {
            walk_level(list, ancestors, visit);
        }
        ancestors.pop();
    }
}

/// Count the elements of a tree that satisfy `predicate`.
pub fn count_elements<F>(elements: &[CodeElement], predicate: F) -> usize
where
    F: Fn(&CodeElement) -> bool,
{
    let mut count = 0;
    walk(elements, &mut |element, _| {
        if predicate(element) {
            count += 1;
        }
    });
    count
}
