//! Stateful selection cursor over a discovered topic tree.
//!
//! A selection UI walks the tree one level at a time: pick a category, then
//! a topic, then (for expanded events) a concrete variant. [`EventSelector`]
//! tracks that walk as a list of chosen child indices, recomputes the
//! current node after every choice, and can rebuild the whole path from a
//! previously exported selection so a stored configuration reopens exactly
//! where the user left it.
//!
//! Each cursor is an independent instance over a shared tree; two panels
//! selecting from the same catalog do not affect each other.
//!
//! ```
//! use vapix_events::{TopicNode, TopicTree};
//! use event_selector::EventSelector;
//!
//! let tree = TopicTree::new(vec![TopicNode {
//!     topic: "tnsaxis:Heartbeat".to_string(),
//!     name: "Heartbeat".to_string(),
//!     uid: 1,
//!     state: None,
//!     filter: None,
//!     display_name: String::new(),
//!     children: None,
//! }]);
//!
//! let mut selector = EventSelector::new(&tree);
//! selector.select(0, 1);
//! assert_eq!(selector.selected().name, "Heartbeat");
//! ```

use vapix_events::{EventFilter, SelectedEvent, TopicNode, TopicTree};

/// One dropdown's worth of data: the candidates at a level and the chosen
/// index (1-based, 0 while nothing is chosen yet)
#[derive(Debug, Clone, Copy)]
pub struct LevelView<'t> {
    /// Candidate topics at this level
    pub options: &'t [TopicNode],
    /// 1-based chosen index, 0 when the level is still open
    pub chosen: usize,
}

/// Tracks a path of choices through a finalized topic tree.
///
/// The selection is a list of 1-based child indices from the root down; a 0
/// entry marks a level where nothing has been chosen yet. The tree itself is
/// never modified.
#[derive(Debug, Clone)]
pub struct EventSelector<'t> {
    root: &'t TopicNode,
    selection: Vec<usize>,
    current: &'t TopicNode,
}

impl<'t> EventSelector<'t> {
    /// Create a cursor positioned at the unselected root of `tree`
    pub fn new(tree: &'t TopicTree) -> Self {
        Self {
            root: tree.root(),
            selection: vec![0],
            current: tree.root(),
        }
    }

    /// The chosen child index per level, root first
    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    /// The node the selection path currently points at
    pub fn current(&self) -> &'t TopicNode {
        self.current
    }

    /// Export the current node as plain data with tree structure stripped
    pub fn selected(&self) -> SelectedEvent {
        SelectedEvent::from(self.current)
    }

    /// Choose the `choice`-th child (1-based; 0 clears the level) at `level`.
    ///
    /// Choosing within the existing path overwrites that level and discards
    /// every deeper choice; choosing at exactly one level past the end
    /// extends the path. Anything deeper is ignored, and an out-of-range
    /// choice clears its level instead of failing.
    pub fn select(&mut self, level: usize, choice: usize) {
        if level > self.selection.len() {
            tracing::warn!(
                "Selection level {} is beyond the open depth {}, ignoring",
                level,
                self.selection.len()
            );
            return;
        }
        if level == self.selection.len() {
            self.selection.push(choice);
        } else {
            self.selection[level] = choice;
            self.selection.truncate(level + 1);
        }
        self.rebuild();
    }

    /// Reposition the cursor on a previously exported selection.
    ///
    /// Searches the tree for a leaf with the same topic whose filter matches
    /// by value (or where both have none). `None`, or an event that no
    /// longer exists in this tree, resets to the unselected root.
    pub fn restore(&mut self, query: Option<&SelectedEvent>) {
        self.selection = match query {
            Some(event) => {
                let mut path = Vec::new();
                let children = self.root.children.as_deref().unwrap_or(&[]);
                if trail_to(event, children, &mut path) {
                    path
                } else {
                    vec![0]
                }
            }
            None => vec![0],
        };
        self.rebuild();
    }

    /// Clear every choice and return to the unselected root
    pub fn clear(&mut self) {
        self.restore(None);
    }

    /// Candidate children and the chosen index for every open level, in
    /// root-to-leaf order. This is exactly what a cascading dropdown renders.
    pub fn levels(&self) -> Vec<LevelView<'t>> {
        let mut levels = Vec::new();
        let mut node = self.root;
        for &chosen in &self.selection {
            let options = match node.children.as_deref() {
                Some(options) => options,
                None => break,
            };
            levels.push(LevelView { options, chosen });
            if chosen == 0 {
                break;
            }
            match options.get(chosen - 1) {
                Some(child) => node = child,
                None => break,
            }
        }
        levels
    }

    /// Recompute the current node by walking the selection from the root,
    /// clamping impossible indices and keeping one open level while the
    /// current node still has children
    fn rebuild(&mut self) {
        let mut node = self.root;
        let mut depth = 0;
        while depth < self.selection.len() {
            let choice = self.selection[depth];
            if choice == 0 {
                self.selection.truncate(depth + 1);
                break;
            }
            match node
                .children
                .as_deref()
                .and_then(|children| children.get(choice - 1))
            {
                Some(child) => node = child,
                None => {
                    tracing::warn!(
                        "Selection index {} at level {} does not exist, clearing",
                        choice,
                        depth
                    );
                    self.selection[depth] = 0;
                    self.selection.truncate(depth + 1);
                    break;
                }
            }
            depth += 1;
        }
        self.current = node;
        if node.children.is_some() && self.selection.last().copied() != Some(0) {
            self.selection.push(0);
        }
    }
}

/// Depth-first search recording the 1-based index path to the leaf matching
/// the exported event
fn trail_to(event: &SelectedEvent, nodes: &[TopicNode], path: &mut Vec<usize>) -> bool {
    for (index, node) in nodes.iter().enumerate() {
        match node.children.as_deref() {
            None => {
                if node.topic == event.topic
                    && filters_match(event.filter.as_ref(), node.filter.as_ref())
                {
                    path.insert(0, index + 1);
                    return true;
                }
            }
            Some(children) => {
                if trail_to(event, children, path) {
                    path.insert(0, index + 1);
                    return true;
                }
            }
        }
    }
    false
}

/// Filters match when both are absent, or by concrete value
fn filters_match(a: Option<&EventFilter>, b: Option<&EventFilter>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.value == b.value,
        _ => false,
    }
}
