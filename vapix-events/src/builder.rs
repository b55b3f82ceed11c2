//! Catalog reader and topic tree builder.
//!
//! Locates the topic-set container inside a `GetEventInstances` response and
//! walks it into a tree of [`RawTopic`] nodes, the parse-time representation
//! that the reorganizer and expander operate on.

use crate::error::{EventError, Result};
use crate::instance::{parse_event_instances, EventInstance};
use crate::topic::string_uid;
use crate::xml;
use xmltree::Element;

/// Parse-time topic node.
///
/// Carries the instance descriptors and the effective namespace that drive
/// reorganization and expansion; none of this survives into the finished
/// tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RawTopic {
    /// Slash-joined path of tags exactly as written in the catalog
    pub topic: String,
    /// NiceName attribute, or the local tag name when absent
    pub name: String,
    /// Hash of the topic path
    pub uid: u32,
    /// Explicit namespace prefix, or the nearest ancestor's
    pub namespace: Option<String>,
    /// Name of the property-state data field, for leaf events that have one
    pub state: Option<String>,
    /// Identifying parameters of a leaf event
    pub source: Option<Vec<EventInstance>>,
    /// Payload fields of a leaf event
    pub data: Option<Vec<EventInstance>>,
    /// Child topics; `None` marks a leaf event declaration
    pub children: Option<Vec<RawTopic>>,
}

/// Walk the document down to the topic-set container.
///
/// The three containers are looked up by local tag name at any depth; the
/// first one missing is reported by name and nothing partial is returned.
pub(crate) fn locate_topic_set(document: &Element) -> Result<&Element> {
    let body = xml::descendant(document, "Body").ok_or(EventError::MissingElement("Body"))?;
    let response = xml::descendant(body, "GetEventInstancesResponse")
        .ok_or(EventError::MissingElement("GetEventInstancesResponse"))?;
    xml::descendant(response, "TopicSet").ok_or(EventError::MissingElement("TopicSet"))
}

/// Build the raw topic tree from the topic-set container element
pub(crate) fn parse_topic_set(topic_set: &Element) -> Vec<RawTopic> {
    parse_children(topic_set, "", None)
}

fn parse_children(
    container: &Element,
    parent_topic: &str,
    parent_namespace: Option<&str>,
) -> Vec<RawTopic> {
    let mut topics = Vec::new();

    for child in xml::child_elements(container) {
        // Application-internal data is excluded along with its whole subtree
        if xml::attr_true(child, "isApplicationData") {
            continue;
        }

        let tag = match child.prefix.as_deref() {
            Some(prefix) => format!("{}:{}", prefix, child.name),
            None => child.name.clone(),
        };
        let namespace = child
            .prefix
            .clone()
            .or_else(|| parent_namespace.map(str::to_string));
        let name = child
            .attributes
            .get("NiceName")
            .cloned()
            .unwrap_or_else(|| child.name.clone());
        let topic = if parent_topic.is_empty() {
            tag
        } else {
            format!("{}/{}", parent_topic, tag)
        };

        let mut node = RawTopic {
            uid: string_uid(&topic),
            topic,
            name,
            namespace,
            ..RawTopic::default()
        };

        if xml::attr_true(child, "topic") {
            // A declared event: parse its instances and keep it a leaf
            let parsed = parse_event_instances(child);
            node.source = parsed.source;
            node.data = parsed.data;
            node.state = parsed.state;
        } else {
            node.children = Some(parse_children(child, &node.topic, node.namespace.as_deref()));
        }

        topics.push(node);
    }

    topics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic_set(inner: &str) -> Element {
        let xml = format!(
            concat!(
                r#"<wstop:TopicSet xmlns:wstop="http://docs.oasis-open.org/wsn/t-1""#,
                r#" xmlns:aev="http://www.axis.com/vapix/ws/event1""#,
                r#" xmlns:tns1="http://www.onvif.org/ver10/topics""#,
                r#" xmlns:tnsaxis="http://www.axis.com/2009/event/topics">{}</wstop:TopicSet>"#
            ),
            inner
        );
        Element::parse(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_namespace_is_inherited_from_nearest_ancestor() {
        // Only the root of the branch carries an explicit prefix
        let set = topic_set(
            r#"<tns1:Device>
                <Status>
                    <Ready wstop:topic="true"/>
                </Status>
            </tns1:Device>"#,
        );

        let topics = parse_topic_set(&set);
        let device = &topics[0];
        assert_eq!(device.namespace.as_deref(), Some("tns1"));
        let status = &device.children.as_ref().unwrap()[0];
        assert_eq!(status.namespace.as_deref(), Some("tns1"));
        let ready = &status.children.as_ref().unwrap()[0];
        assert_eq!(ready.namespace.as_deref(), Some("tns1"));

        // Path segments keep the tags exactly as written
        assert_eq!(ready.topic, "tns1:Device/Status/Ready");
    }

    #[test]
    fn test_explicit_prefix_overrides_inherited_namespace() {
        let set = topic_set(
            r#"<tns1:Device>
                <tnsaxis:IO>
                    <Port wstop:topic="true"/>
                </tnsaxis:IO>
            </tns1:Device>"#,
        );

        let topics = parse_topic_set(&set);
        let io = &topics[0].children.as_ref().unwrap()[0];
        assert_eq!(io.namespace.as_deref(), Some("tnsaxis"));
        let port = &io.children.as_ref().unwrap()[0];
        assert_eq!(port.namespace.as_deref(), Some("tnsaxis"));
        assert_eq!(port.topic, "tns1:Device/tnsaxis:IO/Port");
    }

    #[test]
    fn test_leaf_flag_controls_children() {
        let set = topic_set(
            r#"<tns1:Device>
                <Empty/>
                <Ready wstop:topic="true"/>
            </tns1:Device>"#,
        );

        let topics = parse_topic_set(&set);
        let device = &topics[0];
        assert!(device.children.is_some());
        let children = device.children.as_ref().unwrap();
        // A grouping container keeps a children list even when it is empty
        assert_eq!(children[0].children.as_deref(), Some(&[][..]));
        // A declared event never gets one
        assert!(children[1].children.is_none());
    }

    #[test]
    fn test_nice_name_attribute_wins_over_tag() {
        let set = topic_set(
            r#"<tns1:Device aev:NiceName="Device events">
                <tnsaxis:IO/>
            </tns1:Device>"#,
        );

        let topics = parse_topic_set(&set);
        assert_eq!(topics[0].name, "Device events");
        assert_eq!(topics[0].children.as_ref().unwrap()[0].name, "IO");
    }

    #[test]
    fn test_application_data_subtree_is_excluded() {
        let set = topic_set(
            r#"<tnsaxis:CameraApplicationPlatform>
                <Internal isApplicationData="true">
                    <Secret wstop:topic="true"/>
                </Internal>
                <Visible wstop:topic="true"/>
            </tnsaxis:CameraApplicationPlatform>"#,
        );

        let topics = parse_topic_set(&set);
        let children = topics[0].children.as_ref().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].topic, "tnsaxis:CameraApplicationPlatform/Visible");
    }

    #[test]
    fn test_nested_application_data_is_excluded_at_any_depth() {
        let set = topic_set(
            r#"<tns1:Device>
                <Status>
                    <Hidden isApplicationData="true" wstop:topic="true"/>
                </Status>
            </tns1:Device>"#,
        );

        let topics = parse_topic_set(&set);
        let status = &topics[0].children.as_ref().unwrap()[0];
        assert_eq!(status.children.as_ref().unwrap().len(), 0);
    }

    #[test]
    fn test_leaf_event_carries_parsed_instances() {
        let set = topic_set(
            r#"<tns1:Device>
                <tnsaxis:IO>
                    <Port wstop:topic="true" aev:NiceName="Digital input port">
                        <aev:MessageInstance>
                            <aev:SourceInstance>
                                <aev:SimpleItemInstance Name="port" Type="xsd:int">
                                    <aev:Value aev:NiceName="Input 1">0</aev:Value>
                                    <aev:Value aev:NiceName="Input 2">1</aev:Value>
                                </aev:SimpleItemInstance>
                            </aev:SourceInstance>
                            <aev:DataInstance>
                                <aev:SimpleItemInstance Name="state" Type="xsd:boolean" isPropertyState="true"/>
                                <aev:SimpleItemInstance Name="level" Type="xsd:int">
                                    <aev:Value aev:NiceName="Low">0</aev:Value>
                                    <aev:Value aev:NiceName="High">1</aev:Value>
                                </aev:SimpleItemInstance>
                            </aev:DataInstance>
                        </aev:MessageInstance>
                    </Port>
                </tnsaxis:IO>
            </tns1:Device>"#,
        );

        let topics = parse_topic_set(&set);
        let io = &topics[0].children.as_ref().unwrap()[0];
        let port = &io.children.as_ref().unwrap()[0];
        assert!(port.children.is_none());
        assert_eq!(port.source.as_ref().unwrap()[0].name, "port");
        assert_eq!(port.data.as_ref().unwrap()[0].name, "level");
        assert_eq!(port.state.as_deref(), Some("state"));
    }

    #[test]
    fn test_uid_hashes_topic_path() {
        let set = topic_set(r#"<tns1:Device><tnsaxis:IO/></tns1:Device>"#);
        let topics = parse_topic_set(&set);
        assert_eq!(topics[0].uid, string_uid("tns1:Device"));
        let io = &topics[0].children.as_ref().unwrap()[0];
        assert_eq!(io.uid, string_uid("tns1:Device/tnsaxis:IO"));
    }

    #[test]
    fn test_locate_topic_set_reports_missing_containers() {
        let envelope = |body: &str| {
            format!(
                r#"<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://www.w3.org/2003/05/soap-envelope">{}</SOAP-ENV:Envelope>"#,
                body
            )
        };

        let no_body = Element::parse(envelope("").as_bytes()).unwrap();
        assert!(matches!(
            locate_topic_set(&no_body),
            Err(EventError::MissingElement("Body"))
        ));

        let no_response =
            Element::parse(envelope("<SOAP-ENV:Body/>").as_bytes()).unwrap();
        assert!(matches!(
            locate_topic_set(&no_response),
            Err(EventError::MissingElement("GetEventInstancesResponse"))
        ));

        let no_topic_set = Element::parse(
            envelope(concat!(
                r#"<SOAP-ENV:Body><aev:GetEventInstancesResponse"#,
                r#" xmlns:aev="http://www.axis.com/vapix/ws/event1"/></SOAP-ENV:Body>"#
            ))
            .as_bytes(),
        )
        .unwrap();
        assert!(matches!(
            locate_topic_set(&no_topic_set),
            Err(EventError::MissingElement("TopicSet"))
        ));
    }
}
