//! Source and data instance descriptors attached to leaf events.
//!
//! A leaf event declaration carries a `SourceInstance` block describing the
//! parameters that identify which entity raised the event (e.g. which input
//! port) and a `DataInstance` block describing the payload fields. Both are
//! parsed into [`EventInstance`] descriptors that only exist while the tree
//! is under construction.

use crate::xml;
use xmltree::Element;

/// One parameter or payload field definition under a leaf event
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EventInstance {
    /// Parameter name from the `Name` attribute
    pub name: String,
    /// Type from the `Type` attribute, namespace prefix stripped
    pub kind: String,
    /// Enumerated values this parameter can take
    pub values: Vec<InstanceValue>,
    /// Set when the field carries the event's boolean state role
    pub is_property_state: bool,
}

/// One enumerated value with its display label
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InstanceValue {
    /// Display label; falls back to the raw value when the catalog gives none
    pub label: String,
    /// Raw enumerated value
    pub value: String,
    /// False when `label` is the raw-value fallback
    pub labeled: bool,
}

/// Everything the instance parser extracts from one leaf event element
#[derive(Debug, Default)]
pub(crate) struct ParsedInstances {
    pub source: Option<Vec<EventInstance>>,
    pub data: Option<Vec<EventInstance>>,
    pub state: Option<String>,
}

/// Parse the source and data instance blocks of a leaf event element
pub(crate) fn parse_event_instances(event: &Element) -> ParsedInstances {
    let mut parsed = ParsedInstances::default();
    if let Some(source) = xml::descendant(event, "SourceInstance") {
        let (items, _) = parse_instance_list(source, false);
        parsed.source = items;
    }
    if let Some(data) = xml::descendant(event, "DataInstance") {
        let (items, state) = parse_instance_list(data, true);
        parsed.data = items;
        parsed.state = state;
    }
    parsed
}

/// Parse the item definitions under a source or data instance container.
///
/// A degenerate item (zero values, or exactly one value that had no explicit
/// label) discards the whole list: a single unlabeled value is the catalog's
/// way of saying the parameter is not a user-facing choice. Property-state
/// items are lifted out into `state` instead and never count as degenerate.
fn parse_instance_list(
    container: &Element,
    extract_state: bool,
) -> (Option<Vec<EventInstance>>, Option<String>) {
    let mut items: Option<Vec<EventInstance>> = Some(Vec::new());
    let mut state = None;

    for element in xml::child_elements(container) {
        let item = parse_item(element);
        if extract_state && item.is_property_state {
            state = Some(item.name);
            continue;
        }
        let degenerate =
            item.values.is_empty() || (item.values.len() == 1 && !item.values[0].labeled);
        if degenerate {
            items = None;
        }
        if let Some(items) = items.as_mut() {
            items.push(item);
        }
    }

    (items.filter(|items| !items.is_empty()), state)
}

fn parse_item(element: &Element) -> EventInstance {
    let name = element.attributes.get("Name").cloned().unwrap_or_default();
    let kind = element
        .attributes
        .get("Type")
        .map(|t| strip_namespace(t).to_string())
        .unwrap_or_default();
    let values = xml::child_elements(element).map(parse_value).collect();

    EventInstance {
        name,
        kind,
        values,
        is_property_state: xml::attr_true(element, "isPropertyState"),
    }
}

fn parse_value(element: &Element) -> InstanceValue {
    let value = element
        .get_text()
        .map(|text| text.into_owned())
        .unwrap_or_default();
    match element.attributes.get("NiceName") {
        Some(label) => InstanceValue {
            label: label.clone(),
            value,
            labeled: true,
        },
        None => InstanceValue {
            label: value.clone(),
            value,
            labeled: false,
        },
    }
}

/// Strip a namespace prefix such as `xsd:` from a type string
fn strip_namespace(kind: &str) -> &str {
    kind.split_once(':').map(|(_, local)| local).unwrap_or(kind)
}
