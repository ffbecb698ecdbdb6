//! Active-route matching.

use crate::filter::VisibleNode;

/// Whether a node configured with `node_path` is active for `current_route`.
///
/// Matches the exact path, or any route below it at a segment boundary:
/// `/items` is active for `/items/amazon` but not for `/itemsx`. Nodes without
/// a path are never active themselves.
pub fn is_active(node_path: Option<&str>, current_route: &str) -> bool {
    let Some(path) = node_path else {
        return false;
    };
    if current_route == path {
        return true;
    }

    let base = path.trim_end_matches('/');
    if base.is_empty() {
        // The root path only matches exactly.
        return false;
    }
    current_route
        .strip_prefix(base)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Whether any descendant of `node` (excluding the node itself) is active.
pub fn contains_active_descendant(node: &VisibleNode, current_route: &str) -> bool {
    node.children()
        .iter()
        .any(|child| is_active(child.path(), current_route) || contains_active_descendant(child, current_route))
}
