use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::hierarchy::Forest;

/// How a node places its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrangement {
    /// Children side by side one level below.
    Horizontal,
    /// Children stacked top to bottom, each in its own band.
    Vertical,
}

impl Arrangement {
    /// Roots fan out horizontally, everything below stacks vertically.
    pub fn default_for_depth(depth: usize) -> Self {
        if depth == 0 {
            Arrangement::Horizontal
        } else {
            Arrangement::Vertical
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Arrangement::Horizontal => Arrangement::Vertical,
            Arrangement::Vertical => Arrangement::Horizontal,
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Arrangement::Horizontal => "H",
            Arrangement::Vertical => "V",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeState {
    pub arrangement: Arrangement,
    pub collapsed: bool,
}

/// Per-node arrangement and collapse flags, keyed by node id.
///
/// Owned by a chart instance; the layout functions only read it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutState {
    nodes: HashMap<String, NodeState>,
}

impl LayoutState {
    pub fn initialize(forest: &Forest) -> Self {
        let mut nodes = HashMap::with_capacity(forest.node_count());
        forest.walk(|node, depth| {
            nodes.insert(
                node.id().to_string(),
                NodeState {
                    arrangement: Arrangement::default_for_depth(depth),
                    collapsed: false,
                },
            );
        });
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&NodeState> {
        self.nodes.get(id)
    }

    /// State of a node known to be part of the forest this state was seeded from.
    ///
    /// # Panics
    ///
    /// Panics if `id` has no state, which means the state and the forest are out of sync.
    pub fn node(&self, id: &str) -> NodeState {
        match self.nodes.get(id) {
            Some(state) => *state,
            None => panic!("no layout state for node `{id}`"),
        }
    }

    pub fn toggle_arrangement(&mut self, id: &str) -> Option<Arrangement> {
        let state = self.nodes.get_mut(id)?;
        state.arrangement = state.arrangement.toggled();
        Some(state.arrangement)
    }

    pub fn toggle_collapsed(&mut self, id: &str) -> Option<bool> {
        let state = self.nodes.get_mut(id)?;
        state.collapsed = !state.collapsed;
        Some(state.collapsed)
    }

    pub fn set_collapsed(&mut self, id: &str, collapsed: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(state) => {
                state.collapsed = collapsed;
                true
            }
            None => false,
        }
    }

    pub fn expand_all(&mut self) {
        for state in self.nodes.values_mut() {
            state.collapsed = false;
        }
    }

    pub fn collapse_all(&mut self) {
        for state in self.nodes.values_mut() {
            state.collapsed = true;
        }
    }

    /// Overwrites the arrangement of every non-root node. Roots keep theirs.
    pub fn set_arrangement_for_subtree(&mut self, forest: &Forest, arrangement: Arrangement) {
        forest.walk(|node, depth| {
            if depth == 0 {
                return;
            }
            if let Some(state) = self.nodes.get_mut(node.id()) {
                state.arrangement = arrangement;
            }
        });
    }
}
