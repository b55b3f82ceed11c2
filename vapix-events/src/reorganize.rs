//! Structural rewrite of the parsed catalog into the user-facing taxonomy.
//!
//! Device catalogs group events the way the firmware is organized, not the
//! way users look for them. This module applies a fixed, ordered table of
//! rewrite rules: renaming and merging the application-platform branches,
//! promoting the recurring-alarm topics to the top level, and collecting the
//! scattered detector-style branches under one synthetic "Detectors" node.
//! Each rule addresses a branch by its literal topic path; a branch a device
//! does not expose makes the rule a no-op.

use crate::builder::RawTopic;
use crate::topic::string_uid;

/// Branches whose children are gathered into the synthetic Detectors node,
/// in presentation order. PTZController is renamed before extraction.
const DETECTOR_SOURCES: [(&str, Option<&str>); 7] = [
    ("tns1:Device/tnsaxis:IO", None),
    ("tns1:AudioSource", None),
    ("tns1:VideoSource", None),
    ("tns1:RecordingConfig", None),
    ("tns1:PTZController", Some("PTZ")),
    ("tnsaxis:Storage", None),
    ("tns1:Device/tnsaxis:Status", None),
];

/// Apply every rewrite rule, in order, to the top-level topic list.
///
/// All rewrites are destructive and order-dependent; the Detectors
/// collection runs last and relies on the earlier rules having run.
pub(crate) fn reorganize(topics: &mut Vec<RawTopic>) {
    merge_application_platform(topics);
    promote_recurring(topics, "tns1:UserAlarm/tnsaxis:Recurring/Pulse", "Timer");
    promote_recurring(topics, "tns1:UserAlarm/tnsaxis:Recurring/Interval", "Schedules");
    remove(topics, "tns1:UserAlarm");
    if let Some(device) = find_mut(topics, "tns1:Device") {
        device.name = "Exceptions".to_string();
    }
    remove(topics, "tns1:PTZController/tnsaxis:ControlQueue");
    collect_detectors(topics);
}

/// Rename the camera-application platform branch to "ACAP" and fold the
/// rule-engine branch's children into it
fn merge_application_platform(topics: &mut Vec<RawTopic>) {
    if find(topics, "tnsaxis:CameraApplicationPlatform").is_none() {
        return;
    }
    let engine_children = remove(topics, "tns1:RuleEngine").and_then(|engine| engine.children);
    if let Some(acap) = find_mut(topics, "tnsaxis:CameraApplicationPlatform") {
        acap.name = "ACAP".to_string();
        if let Some(mut extra) = engine_children {
            acap.children.get_or_insert_with(Vec::new).append(&mut extra);
        }
    }
}

/// Pull a recurring-alarm branch out of the user-alarm subtree and re-append
/// it at the top level under a friendlier name
fn promote_recurring(topics: &mut Vec<RawTopic>, path: &str, name: &str) {
    if let Some(mut branch) = remove(topics, path) {
        branch.name = name.to_string();
        topics.push(branch);
    }
}

/// Gather the detector-style branches into one synthetic top-level node
fn collect_detectors(topics: &mut Vec<RawTopic>) {
    let mut collected = Vec::new();
    for (path, rename) in DETECTOR_SOURCES {
        if let Some(mut branch) = remove(topics, path) {
            if let Some(name) = rename {
                branch.name = name.to_string();
            }
            if let Some(mut children) = branch.children.take() {
                collected.append(&mut children);
            }
        }
    }
    topics.push(RawTopic {
        topic: "detectors".to_string(),
        name: "Detectors".to_string(),
        uid: string_uid("detectors"),
        children: Some(collected),
        ..RawTopic::default()
    });
}

/// Pre-order search for the first node with the given topic path
fn find<'a>(topics: &'a [RawTopic], path: &str) -> Option<&'a RawTopic> {
    for node in topics {
        if node.topic == path {
            return Some(node);
        }
        if let Some(found) = node
            .children
            .as_deref()
            .and_then(|children| find(children, path))
        {
            return Some(found);
        }
    }
    None
}

/// Pre-order search returning a mutable handle to the first match
fn find_mut<'a>(topics: &'a mut [RawTopic], path: &str) -> Option<&'a mut RawTopic> {
    for node in topics.iter_mut() {
        if node.topic == path {
            return Some(node);
        }
        if let Some(children) = node.children.as_deref_mut() {
            if let Some(found) = find_mut(children, path) {
                return Some(found);
            }
        }
    }
    None
}

/// Splice out and return the first node with the given topic path, wherever
/// it sits in the tree
fn remove(topics: &mut Vec<RawTopic>, path: &str) -> Option<RawTopic> {
    for index in 0..topics.len() {
        if topics[index].topic == path {
            return Some(topics.remove(index));
        }
        if let Some(children) = topics[index].children.as_mut() {
            if let Some(removed) = remove(children, path) {
                return Some(removed);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(topic: &str, children: Vec<RawTopic>) -> RawTopic {
        let name = topic.rsplit(&[':', '/'][..]).next().unwrap_or(topic);
        RawTopic {
            topic: topic.to_string(),
            name: name.to_string(),
            uid: string_uid(topic),
            children: Some(children),
            ..RawTopic::default()
        }
    }

    fn event(topic: &str) -> RawTopic {
        RawTopic {
            children: None,
            ..branch(topic, Vec::new())
        }
    }

    fn names(topics: &[RawTopic]) -> Vec<&str> {
        topics.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn test_detectors_collects_children_in_branch_order() {
        let mut topics = vec![
            branch(
                "tns1:Device",
                vec![branch(
                    "tns1:Device/tnsaxis:IO",
                    vec![
                        event("tns1:Device/tnsaxis:IO/Port"),
                        event("tns1:Device/tnsaxis:IO/VirtualPort"),
                    ],
                )],
            ),
            branch(
                "tns1:AudioSource",
                vec![event("tns1:AudioSource/TriggerLevel")],
            ),
        ];

        reorganize(&mut topics);

        let detectors = find(&topics, "detectors").expect("Detectors created");
        let children = detectors.children.as_ref().unwrap();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].topic, "tns1:Device/tnsaxis:IO/Port");
        assert_eq!(children[1].topic, "tns1:Device/tnsaxis:IO/VirtualPort");
        assert_eq!(children[2].topic, "tns1:AudioSource/TriggerLevel");

        // The source branches themselves are gone
        assert!(find(&topics, "tns1:Device/tnsaxis:IO").is_none());
        assert!(find(&topics, "tns1:AudioSource").is_none());
    }

    #[test]
    fn test_acap_rename_and_rule_engine_fold() {
        let mut topics = vec![
            branch(
                "tnsaxis:CameraApplicationPlatform",
                vec![branch("tnsaxis:CameraApplicationPlatform/VMD", Vec::new())],
            ),
            branch(
                "tns1:RuleEngine",
                vec![event("tns1:RuleEngine/MotionRegionDetector")],
            ),
        ];

        reorganize(&mut topics);

        assert!(find(&topics, "tns1:RuleEngine").is_none());
        let acap = find(&topics, "tnsaxis:CameraApplicationPlatform").unwrap();
        assert_eq!(acap.name, "ACAP");
        let children = acap.children.as_ref().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].topic, "tns1:RuleEngine/MotionRegionDetector");
    }

    #[test]
    fn test_rule_engine_stays_without_application_platform() {
        let mut topics = vec![branch(
            "tns1:RuleEngine",
            vec![event("tns1:RuleEngine/MotionRegionDetector")],
        )];

        reorganize(&mut topics);

        assert!(find(&topics, "tns1:RuleEngine").is_some());
    }

    #[test]
    fn test_recurring_branches_promoted_and_user_alarm_deleted() {
        let mut topics = vec![branch(
            "tns1:UserAlarm",
            vec![branch(
                "tns1:UserAlarm/tnsaxis:Recurring",
                vec![
                    event("tns1:UserAlarm/tnsaxis:Recurring/Pulse"),
                    event("tns1:UserAlarm/tnsaxis:Recurring/Interval"),
                ],
            )],
        )];

        reorganize(&mut topics);

        assert!(find(&topics, "tns1:UserAlarm").is_none());
        let timer = find(&topics, "tns1:UserAlarm/tnsaxis:Recurring/Pulse").unwrap();
        assert_eq!(timer.name, "Timer");
        let schedules = find(&topics, "tns1:UserAlarm/tnsaxis:Recurring/Interval").unwrap();
        assert_eq!(schedules.name, "Schedules");
        // Both now sit at the top level, after the synthetic Detectors push
        assert!(names(&topics).contains(&"Timer"));
        assert!(names(&topics).contains(&"Schedules"));
    }

    #[test]
    fn test_device_renamed_to_exceptions_and_control_queue_dropped() {
        let mut topics = vec![
            branch(
                "tns1:Device",
                vec![branch("tns1:Device/tnsaxis:SystemMessage", Vec::new())],
            ),
            branch(
                "tns1:PTZController",
                vec![
                    branch("tns1:PTZController/tnsaxis:ControlQueue", Vec::new()),
                    event("tns1:PTZController/tnsaxis:Move"),
                ],
            ),
        ];

        reorganize(&mut topics);

        let device = find(&topics, "tns1:Device").unwrap();
        assert_eq!(device.name, "Exceptions");
        assert!(find(&topics, "tns1:PTZController/tnsaxis:ControlQueue").is_none());
        // The remaining PTZ child moved into Detectors
        let detectors = find(&topics, "detectors").unwrap();
        let children = detectors.children.as_ref().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].topic, "tns1:PTZController/tnsaxis:Move");
    }

    #[test]
    fn test_absent_branches_make_rules_no_ops() {
        let mut topics = vec![branch("tnsaxis:Heartbeat", Vec::new())];

        reorganize(&mut topics);

        assert!(find(&topics, "tnsaxis:Heartbeat").is_some());
        // Detectors is still created, merely empty
        let detectors = find(&topics, "detectors").unwrap();
        assert_eq!(detectors.children.as_ref().unwrap().len(), 0);
        assert_eq!(topics.len(), 2);
    }

    #[test]
    fn test_remove_splices_from_nested_position() {
        let mut topics = vec![branch(
            "tns1:A",
            vec![branch("tns1:A/B", vec![event("tns1:A/B/C")])],
        )];

        let removed = remove(&mut topics, "tns1:A/B/C").expect("nested removal");
        assert_eq!(removed.topic, "tns1:A/B/C");
        assert_eq!(
            find(&topics, "tns1:A/B").unwrap().children.as_ref().unwrap().len(),
            0
        );
        assert!(remove(&mut topics, "tns1:A/B/C").is_none());
    }
}
