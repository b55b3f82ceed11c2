//! Small DOM-walk helpers shared by the parsing stages

use xmltree::{Element, XMLNode};

/// Iterate the element children of a node, skipping text and comments
pub(crate) fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(e) => Some(e),
        _ => None,
    })
}

/// Depth-first search for the first descendant element with the given local
/// name. The starting element itself is not considered a match.
pub(crate) fn descendant<'a>(element: &'a Element, local_name: &str) -> Option<&'a Element> {
    for child in child_elements(element) {
        if child.name == local_name {
            return Some(child);
        }
        if let Some(found) = descendant(child, local_name) {
            return Some(found);
        }
    }
    None
}

/// True when the element carries the attribute with the literal value "true"
pub(crate) fn attr_true(element: &Element, name: &str) -> bool {
    element.attributes.get(name).map(String::as_str) == Some("true")
}
