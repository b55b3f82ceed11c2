//! The finalized event topic tree and its exported forms.
//!
//! A discovered catalog is presented as a tree of [`TopicNode`]s rooted in a
//! [`TopicTree`]. Containers carry children; leaf events carry an optional
//! [`EventFilter`] identifying one parameterized variant. A chosen leaf is
//! exported as a [`SelectedEvent`], a plain value safe to store in app
//! configuration and feed back later to restore the selection.

use serde::{Deserialize, Serialize};

/// Query filter attached to an expanded leaf event.
///
/// Identifies one concrete variant of a parameterized event, such as a single
/// input port, together with the subscription predicate the device expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    /// Source parameter name (e.g. "port")
    pub name: String,
    /// Parameter type with any namespace prefix stripped (e.g. "int")
    #[serde(rename = "type")]
    pub kind: String,
    /// Concrete enumerated value selecting this variant
    pub value: String,
    /// Subscription predicate in the device's filter grammar. The closing
    /// parenthesis is missing on the wire as well; devices accept only this
    /// exact form.
    pub onvif: String,
}

/// A node in the finalized topic tree.
///
/// A node is either a container (`children` is `Some`, never a `filter`) or a
/// leaf event (`children` is `None`, `filter` present when the leaf was
/// expanded from an enumerated parameter).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicNode {
    /// Namespace-qualified, slash-joined path from the tree root
    pub topic: String,
    /// Short display label
    pub name: String,
    /// Stable non-negative identifier derived from the topic path, plus the
    /// filter predicate for expanded leaves
    pub uid: u32,
    /// Name of the event's property-state field, when it has one
    pub state: Option<String>,
    /// Present only on expanded leaf events
    pub filter: Option<EventFilter>,
    /// Fully qualified display path, slash-joined from the top level down
    #[serde(rename = "displayName")]
    pub display_name: String,
    /// Child topics; `None` marks a leaf event
    pub children: Option<Vec<TopicNode>>,
}

impl TopicNode {
    /// True when this node is a leaf event rather than a grouping container
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// A selected event exported as plain data, with tree structure stripped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedEvent {
    /// Namespace-qualified topic path of the event
    pub topic: String,
    /// Display label of the selected node
    pub name: String,
    /// Stable identifier of the selected node
    pub uid: u32,
    /// Name of the event's property-state field, when it has one
    pub state: Option<String>,
    /// Variant filter, when the selection is an expanded leaf
    pub filter: Option<EventFilter>,
    /// Fully qualified display path
    #[serde(rename = "displayName")]
    pub display_name: String,
}

impl From<&TopicNode> for SelectedEvent {
    fn from(node: &TopicNode) -> Self {
        Self {
            topic: node.topic.clone(),
            name: node.name.clone(),
            uid: node.uid,
            state: node.state.clone(),
            filter: node.filter.clone(),
            display_name: node.display_name.clone(),
        }
    }
}

/// The finalized, reorganized event topic tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TopicTree {
    root: TopicNode,
}

impl TopicTree {
    /// Assemble a tree from finalized top-level topics.
    ///
    /// Wraps the topics in the catalog root node and computes every display
    /// path top-down, so the tree is ready for presentation.
    pub fn new(mut children: Vec<TopicNode>) -> Self {
        annotate_display_names(&mut children, "");
        Self {
            root: TopicNode {
                topic: "wstop:TopicSet".to_string(),
                name: "Topics".to_string(),
                uid: 0,
                state: None,
                filter: None,
                display_name: "Topics".to_string(),
                children: Some(children),
            },
        }
    }

    /// A tree with no topics at all, the result of every failed discovery
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The catalog root node
    pub fn root(&self) -> &TopicNode {
        &self.root
    }

    /// True when the tree holds no topics
    pub fn is_empty(&self) -> bool {
        self.root
            .children
            .as_ref()
            .map(Vec::is_empty)
            .unwrap_or(true)
    }

    /// Every leaf event in the tree, sorted by display label for browsing
    pub fn events(&self) -> Vec<&TopicNode> {
        let mut events = Vec::new();
        collect_leaves(&self.root, &mut events);
        events.sort_by(|a, b| a.name.cmp(&b.name));
        events
    }
}

fn collect_leaves<'a>(node: &'a TopicNode, events: &mut Vec<&'a TopicNode>) {
    match node.children.as_deref() {
        Some(children) => {
            for child in children {
                collect_leaves(child, events);
            }
        }
        None => events.push(node),
    }
}

/// Assign every node its slash-joined display path, top-down.
///
/// Runs after reorganization and expansion; any structural rewrite
/// invalidates previously computed paths.
pub(crate) fn annotate_display_names(nodes: &mut [TopicNode], parent: &str) {
    for node in nodes {
        node.display_name = if parent.is_empty() {
            node.name.clone()
        } else {
            format!("{}/{}", parent, node.name)
        };
        let parent = node.display_name.clone();
        if let Some(children) = node.children.as_deref_mut() {
            annotate_display_names(children, &parent);
        }
    }
}

/// Deterministic non-negative 32-bit identifier for a topic string.
///
/// Accumulates `hash * 31 + unit` over UTF-16 units with 32-bit wrapping,
/// then takes the absolute value. Existing deployments persist selections
/// keyed on these values, so the exact mixing is load-bearing.
pub(crate) fn string_uid(text: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in text.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    hash.unsigned_abs()
}
