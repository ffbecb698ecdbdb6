//! Tree filtering: the static navigation tree projected onto the user's
//! resolved capabilities.
//!
//! The result is a freshly built [`VisibleTree`]; the static tree is never
//! touched. Evaluation is a bottom-up reduction: a node is kept if it passes
//! its own gate or if any of its children is kept.

use std::sync::Arc;

use opsdash_registry::NavigationTree;
use opsdash_types::{CapabilityRequirement, NavigationNode};
use serde::Serialize;

use crate::resolve::ResolvedCapabilitySet;

/// A navigation node as shown to the current user, with children already
/// filtered. Read-only: a changed input produces a new tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleNode {
    name: String,
    path: Option<String>,
    required_capability: Option<CapabilityRequirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<VisibleNode>,
}

impl VisibleNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn required_capability(&self) -> Option<&CapabilityRequirement> {
        self.required_capability.as_ref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn children(&self) -> &[VisibleNode] {
        &self.children
    }

    /// Whether the node has visible children to expand.
    pub fn is_expandable(&self) -> bool {
        !self.children.is_empty()
    }
}

/// The per-user visible navigation tree. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VisibleTree(Arc<[VisibleNode]>);

impl Default for VisibleTree {
    fn default() -> Self {
        Self(Arc::from(Vec::new()))
    }
}

impl VisibleTree {
    pub fn roots(&self) -> &[VisibleNode] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Depth-first, pre-order traversal yielding `(depth, node)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &VisibleNode)> {
        let mut stack: Vec<(usize, &VisibleNode)> = self.0.iter().rev().map(|node| (0, node)).collect();
        std::iter::from_fn(move || {
            let (depth, node) = stack.pop()?;
            stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
            Some((depth, node))
        })
    }

    /// Total number of visible nodes.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether some visible node is named `name` and has children to expand.
    pub fn has_expandable(&self, name: &str) -> bool {
        self.iter().any(|(_, node)| node.name == name && node.is_expandable())
    }

    /// Whether every node of `self` exists at the same structural position
    /// (matched by sibling name) in `other`.
    pub fn is_subtree_of(&self, other: &VisibleTree) -> bool {
        siblings_subset(self.roots(), other.roots())
    }
}

fn siblings_subset(ours: &[VisibleNode], theirs: &[VisibleNode]) -> bool {
    ours.iter().all(|node| {
        theirs
            .iter()
            .find(|candidate| candidate.name == node.name)
            .is_some_and(|candidate| siblings_subset(&node.children, &candidate.children))
    })
}

/// Derives the visible tree.
///
/// While `is_loading` is true the result is empty: nothing is shown until the
/// user's capabilities are confirmed. Sibling order is preserved.
pub fn filter_tree(tree: &NavigationTree, capabilities: &ResolvedCapabilitySet, is_loading: bool) -> VisibleTree {
    if is_loading {
        return VisibleTree::default();
    }
    let roots: Vec<VisibleNode> = tree
        .roots
        .iter()
        .filter_map(|node| filter_node(node, capabilities))
        .collect();
    VisibleTree(roots.into())
}

fn filter_node(node: &NavigationNode, capabilities: &ResolvedCapabilitySet) -> Option<VisibleNode> {
    let passes_own_gate = node
        .required_capability_name()
        .is_none_or(|name| capabilities.contains(name));

    let children: Vec<VisibleNode> = node
        .children
        .iter()
        .filter_map(|child| filter_node(child, capabilities))
        .collect();

    if children.is_empty() && !passes_own_gate {
        return None;
    }

    Some(VisibleNode {
        name: node.name.clone(),
        path: node.path.clone(),
        required_capability: node.required_capability.clone(),
        icon: node.icon.clone(),
        children,
    })
}
