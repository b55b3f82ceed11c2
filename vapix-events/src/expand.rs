//! Expansion of parameterized events into one leaf per enumerated value.
//!
//! A leaf event that kept a source descriptor (say a digital-input event
//! whose `port` parameter enumerates four ports) becomes a container with
//! one child leaf per value. Each generated leaf carries the filter that
//! selects its variant and an identifier hashed over the topic path plus the
//! filter predicate, so distinct variants of one topic stay distinguishable.
//! Converting to [`TopicNode`] also drops the parse-only fields everywhere.

use crate::builder::RawTopic;
use crate::instance::EventInstance;
use crate::topic::{string_uid, EventFilter, TopicNode};

/// Convert the reorganized parse tree into finished nodes, expanding any
/// node that retained a source descriptor
pub(crate) fn finalize(topics: Vec<RawTopic>) -> Vec<TopicNode> {
    topics.into_iter().map(finalize_node).collect()
}

fn finalize_node(raw: RawTopic) -> TopicNode {
    let RawTopic {
        topic,
        name,
        uid,
        state,
        source,
        children,
        ..
    } = raw;

    // Only the first source descriptor drives expansion; device catalogs
    // have not been seen to carry more than one.
    if let Some(descriptor) = source.as_ref().and_then(|descriptors| descriptors.first()) {
        let leaves = expand_values(&topic, state.as_deref(), descriptor);
        return TopicNode {
            topic,
            name,
            uid,
            state,
            filter: None,
            display_name: String::new(),
            children: Some(leaves),
        };
    }

    TopicNode {
        topic,
        name,
        uid,
        state,
        filter: None,
        display_name: String::new(),
        children: children.map(finalize),
    }
}

fn expand_values(topic: &str, state: Option<&str>, descriptor: &EventInstance) -> Vec<TopicNode> {
    descriptor
        .values
        .iter()
        .map(|value| {
            let onvif = format!(
                r#"{}(//SimpleItem[@Name="{}" and @Value="{}")"#,
                descriptor.kind, descriptor.name, value.value
            );
            TopicNode {
                topic: topic.to_string(),
                name: value.label.clone(),
                uid: string_uid(&format!("{}{}", topic, onvif)),
                state: state.map(str::to_string),
                filter: Some(EventFilter {
                    name: descriptor.name.clone(),
                    kind: descriptor.kind.clone(),
                    value: value.value.clone(),
                    onvif,
                }),
                display_name: String::new(),
                children: None,
            }
        })
        .collect()
}
