//! Event declaration discovery for Axis cameras
//!
//! This crate queries a camera's VAPIX event web service for the catalog of
//! event declarations it can emit and transforms the SOAP topic set into a
//! clean, hierarchical tree suitable for a selection UI: vendor branches are
//! renamed and regrouped into user-facing categories, parameterized events
//! are expanded into one leaf per enumerated value (each with a stable
//! identifier and a subscription filter), and every node gets a fully
//! qualified display path.
//!
//! # Quick start
//!
//! ```no_run
//! let tree = vapix_events::discover("192.168.0.90")?;
//! for event in tree.events() {
//!     println!("{} (uid {})", event.display_name, event.uid);
//! }
//! # Ok::<(), vapix_events::EventError>(())
//! ```
//!
//! # Offline parsing
//!
//! A raw response document can be transformed without touching the network,
//! which is also how every failure path degrades:
//!
//! ```
//! use vapix_events::TopicTree;
//!
//! // Anything that is not a catalog becomes an empty tree, with the cause
//! // logged through `tracing`.
//! let tree = TopicTree::from_xml_or_empty("<not-a-catalog/>");
//! assert!(tree.is_empty());
//! ```

mod builder;
mod expand;
mod instance;
mod reorganize;
mod xml;

pub mod discovery;
pub mod error;
pub mod topic;

pub use discovery::{discover, discover_or_empty};
pub use error::{EventError, Result};
pub use topic::{EventFilter, SelectedEvent, TopicNode, TopicTree};
