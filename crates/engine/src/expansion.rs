//! Sidebar expansion state.
//!
//! Two independent axes: which nodes are expanded (by name) and whether the
//! sidebar is in collapsed-width mode. All transitions go through
//! [`ExpansionController::apply`].

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::filter::{VisibleNode, VisibleTree};
use crate::route::is_active;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpansionState {
    expanded_names: BTreeSet<String>,
    collapsed_width: bool,
}

impl ExpansionState {
    pub fn expanded_names(&self) -> &BTreeSet<String> {
        &self.expanded_names
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.expanded_names.contains(name)
    }

    pub fn collapsed_width(&self) -> bool {
        self.collapsed_width
    }
}

/// Inputs folded into the expansion state.
#[derive(Debug, Clone, Copy)]
pub enum ExpansionEvent<'a> {
    /// The current route or the visible tree changed.
    Recompute { tree: &'a VisibleTree, route: &'a str },
    /// The operator clicked a group header.
    ToggleNode { tree: &'a VisibleTree, name: &'a str },
    /// The operator toggled the sidebar width.
    ToggleWidth,
}

/// Sole owner and writer of [`ExpansionState`] for a mounted sidebar.
#[derive(Debug, Clone, Default)]
pub struct ExpansionController {
    state: ExpansionState,
}

impl ExpansionController {
    /// Nothing expanded, full width.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ExpansionState {
        &self.state
    }

    /// Applies one event. Returns whether the state changed.
    pub fn apply(&mut self, event: ExpansionEvent<'_>) -> bool {
        let before = self.state.clone();
        match event {
            ExpansionEvent::Recompute { tree, route } => {
                // Collapsed width shows no submenus; the set stays empty until
                // the next recompute after widening.
                if !self.state.collapsed_width {
                    // Replaces, never merges with, manually opened groups.
                    self.state.expanded_names = auto_expanded_names(tree, route);
                }
            }
            ExpansionEvent::ToggleNode { tree, name } => {
                if !tree.has_expandable(name) {
                    debug!(name, "ignoring toggle for a node that is not an expandable visible group");
                    return false;
                }
                self.state.collapsed_width = false;
                if !self.state.expanded_names.remove(name) {
                    self.state.expanded_names.insert(name.to_string());
                }
            }
            ExpansionEvent::ToggleWidth => {
                self.state.collapsed_width = !self.state.collapsed_width;
                if self.state.collapsed_width {
                    self.state.expanded_names.clear();
                }
            }
        }
        self.state != before
    }
}

/// Names of every visible node that is active for `route` or has an active
/// descendant.
pub fn auto_expanded_names(tree: &VisibleTree, route: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for node in tree.roots() {
        collect_active(node, route, &mut names);
    }
    names
}

/// Returns whether `node` or anything below it is active, recording names on
/// the way back up.
fn collect_active(node: &VisibleNode, route: &str, names: &mut BTreeSet<String>) -> bool {
    let mut active = is_active(node.path(), route);
    for child in node.children() {
        // No short-circuit: every active branch must be recorded.
        active |= collect_active(child, route, names);
    }
    if active {
        names.insert(node.name().to_string());
    }
    active
}

#[cfg(test)]
mod tests {
    use opsdash_registry::NavigationTree;
    use opsdash_types::NavigationNode;

    use super::*;
    use crate::filter::filter_tree;
    use crate::resolve::ResolvedCapabilitySet;

    fn visible() -> VisibleTree {
        let tree = NavigationTree::new(vec![
            NavigationNode::leaf("Dashboard", "/"),
            NavigationNode::group(
                "Items",
                vec![
                    NavigationNode::leaf("Amazon", "/items/amazon"),
                    NavigationNode::leaf("Walmart", "/items/walmart"),
                ],
            )
            .with_path("/items"),
            NavigationNode::group(
                "Reports",
                vec![NavigationNode::group(
                    "Amazon Reports",
                    vec![NavigationNode::leaf("Settlements", "/reports/amazon/settlements")],
                )],
            ),
        ]);
        filter_tree(&tree, &ResolvedCapabilitySet::new(), false)
    }

    fn names(state: &ExpansionState) -> Vec<&str> {
        state.expanded_names().iter().map(String::as_str).collect()
    }

    #[test]
    fn initial_state_is_empty_and_wide() {
        let controller = ExpansionController::new();
        assert!(controller.state().expanded_names().is_empty());
        assert!(!controller.state().collapsed_width());
    }

    #[test]
    fn recompute_expands_every_ancestor_of_the_active_route() {
        let tree = visible();
        let mut controller = ExpansionController::new();
        controller.apply(ExpansionEvent::Recompute {
            tree: &tree,
            route: "/reports/amazon/settlements",
        });
        assert_eq!(names(controller.state()), vec!["Amazon Reports", "Reports", "Settlements"]);
    }

    #[test]
    fn recompute_replaces_manual_expansion() {
        let tree = visible();
        let mut controller = ExpansionController::new();
        controller.apply(ExpansionEvent::Recompute { tree: &tree, route: "/items/amazon" });
        controller.apply(ExpansionEvent::ToggleNode { tree: &tree, name: "Reports" });
        assert!(controller.state().is_expanded("Reports"));

        controller.apply(ExpansionEvent::Recompute { tree: &tree, route: "/items/walmart" });
        assert_eq!(names(controller.state()), vec!["Items", "Walmart"]);
    }

    #[test]
    fn toggle_flips_membership() {
        let tree = visible();
        let mut controller = ExpansionController::new();
        assert!(controller.apply(ExpansionEvent::ToggleNode { tree: &tree, name: "Items" }));
        assert!(controller.state().is_expanded("Items"));
        assert!(controller.apply(ExpansionEvent::ToggleNode { tree: &tree, name: "Items" }));
        assert!(!controller.state().is_expanded("Items"));
    }

    #[test]
    fn toggle_ignores_leaves_and_unknown_names() {
        let tree = visible();
        let mut controller = ExpansionController::new();
        assert!(!controller.apply(ExpansionEvent::ToggleNode { tree: &tree, name: "Dashboard" }));
        assert!(!controller.apply(ExpansionEvent::ToggleNode { tree: &tree, name: "Ghost" }));
        assert!(controller.state().expanded_names().is_empty());
    }

    #[test]
    fn collapsing_width_clears_expansion() {
        let tree = visible();
        let mut controller = ExpansionController::new();
        controller.apply(ExpansionEvent::ToggleNode { tree: &tree, name: "Reports" });
        controller.apply(ExpansionEvent::ToggleWidth);
        assert!(controller.state().collapsed_width());
        assert!(controller.state().expanded_names().is_empty());

        controller.apply(ExpansionEvent::ToggleWidth);
        assert!(!controller.state().collapsed_width());
        assert!(controller.state().expanded_names().is_empty(), "widening does not restore groups");
    }

    #[test]
    fn toggling_a_group_while_collapsed_widens_first() {
        let tree = visible();
        let mut controller = ExpansionController::new();
        controller.apply(ExpansionEvent::ToggleWidth);
        controller.apply(ExpansionEvent::ToggleNode { tree: &tree, name: "Items" });
        assert!(!controller.state().collapsed_width());
        assert!(controller.state().is_expanded("Items"));
    }

    #[test]
    fn recompute_is_skipped_while_collapsed() {
        let tree = visible();
        let mut controller = ExpansionController::new();
        controller.apply(ExpansionEvent::ToggleWidth);
        assert!(!controller.apply(ExpansionEvent::Recompute { tree: &tree, route: "/items/amazon" }));
        assert!(controller.state().expanded_names().is_empty());

        controller.apply(ExpansionEvent::ToggleWidth);
        controller.apply(ExpansionEvent::Recompute { tree: &tree, route: "/items/amazon" });
        assert_eq!(names(controller.state()), vec!["Amazon", "Items"]);
    }
}
