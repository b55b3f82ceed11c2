//! Discovery of the event declarations a device exposes.
//!
//! One `GetEventInstances` call returns the whole catalog; the response is
//! then pushed through the synchronous transformation pipeline (tree build,
//! instance parse, reorganization, expansion, display annotation) to produce
//! a finished [`TopicTree`]. There is nothing to resume on failure: callers
//! that want another attempt issue a fresh discovery.

use crate::builder;
use crate::error::{EventError, Result};
use crate::expand;
use crate::reorganize;
use crate::topic::TopicTree;
use crate::xml;
use soap_client::SoapClient;
use xmltree::Element;

const ACTION: &str = "GetEventInstances";

/// Fetch the event catalog from a device and build the topic tree
///
/// # Arguments
/// * `host` - Device address, `ip` or `ip:port`
pub fn discover(host: &str) -> Result<TopicTree> {
    let client = SoapClient::new();
    let response = client.call(host, ACTION, "")?;
    let topic_set =
        xml::descendant(&response, "TopicSet").ok_or(EventError::MissingElement("TopicSet"))?;
    let tree = assemble(topic_set);
    tracing::debug!("Discovered {} events from {}", tree.events().len(), host);
    Ok(tree)
}

/// Fetch the event catalog, degrading every failure to an empty tree.
///
/// The error is logged rather than returned; selection UIs simply render no
/// choices.
pub fn discover_or_empty(host: &str) -> TopicTree {
    discover(host).unwrap_or_else(|e| {
        tracing::error!("Event discovery against {} failed: {}", host, e);
        TopicTree::empty()
    })
}

impl TopicTree {
    /// Build the topic tree from a raw `GetEventInstances` response document.
    ///
    /// Accepts the full SOAP envelope text and fails with the name of the
    /// first missing container when the document does not hold a catalog.
    pub fn from_xml(xml_text: &str) -> Result<Self> {
        let document = Element::parse(xml_text.as_bytes())
            .map_err(|e| EventError::Parse(e.to_string()))?;
        let topic_set = builder::locate_topic_set(&document)?;
        Ok(assemble(topic_set))
    }

    /// Build the topic tree from a raw response document, degrading every
    /// failure to an empty tree and logging the cause
    pub fn from_xml_or_empty(xml_text: &str) -> Self {
        Self::from_xml(xml_text).unwrap_or_else(|e| {
            tracing::error!("Failed to parse event declarations: {}", e);
            Self::empty()
        })
    }
}

/// Run the transformation pipeline over a located topic-set container
fn assemble(topic_set: &Element) -> TopicTree {
    let mut raw = builder::parse_topic_set(topic_set);
    reorganize::reorganize(&mut raw);
    TopicTree::new(expand::finalize(raw))
}
