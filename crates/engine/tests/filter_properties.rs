//! Property-based invariant tests for tree filtering and auto-expansion.
//!
//! 1. Fail-closed: nothing is visible while the catalog is loading.
//! 2. Monotonicity: more capabilities never hide a node.
//! 3. No orphans: every visible node sits under visible ancestors and is kept
//!    either by its own gate or by a visible child.
//! 4. Idempotence: filtering twice yields the same tree.
//! 5. Auto-expand coverage: every ancestor of the active node is expanded.

use opsdash_engine::{ResolvedCapabilitySet, VisibleNode, VisibleTree, auto_expanded_names, filter_tree};
use opsdash_registry::NavigationTree;
use opsdash_types::NavigationNode;
use proptest::prelude::*;
use proptest::sample::Index;

const CAPABILITIES: &[&str] = &["inventory", "reports", "logistics", "admin"];

// ── Helpers ─────────────────────────────────────────────────────────────

/// Tree structure before names and paths are assigned.
#[derive(Debug, Clone)]
struct Shape {
    requires: Option<&'static str>,
    routable: bool,
    children: Vec<Shape>,
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let requires = prop::option::of(prop::sample::select(CAPABILITIES));
    let leaf = (requires.clone(), any::<bool>()).prop_map(|(requires, routable)| Shape {
        requires,
        routable,
        children: Vec::new(),
    });
    leaf.prop_recursive(4, 48, 4, move |inner| {
        (requires.clone(), any::<bool>(), prop::collection::vec(inner, 0..4)).prop_map(
            |(requires, routable, children)| Shape {
                requires,
                routable,
                children,
            },
        )
    })
}

fn tree_strategy() -> impl Strategy<Value = NavigationTree> {
    prop::collection::vec(shape_strategy(), 0..5).prop_map(|shapes| NavigationTree::new(build(&shapes, "")))
}

/// Sibling names are positional, so they are unique within each sibling list.
fn build(shapes: &[Shape], parent_path: &str) -> Vec<NavigationNode> {
    shapes
        .iter()
        .enumerate()
        .map(|(index, shape)| {
            let name = format!("n{index}");
            let path = format!("{parent_path}/{name}");
            let mut node = NavigationNode::group(name, build(&shape.children, &path));
            if shape.routable {
                node = node.with_path(path);
            }
            if let Some(capability) = shape.requires {
                node = node.requires(capability);
            }
            node
        })
        .collect()
}

fn capability_set_strategy() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), CAPABILITIES.len())
}

fn to_set(mask: &[bool]) -> ResolvedCapabilitySet {
    CAPABILITIES
        .iter()
        .zip(mask)
        .filter(|(_, held)| **held)
        .map(|(name, _)| *name)
        .collect()
}

fn everything() -> ResolvedCapabilitySet {
    CAPABILITIES.iter().copied().collect()
}

/// Every routable visible node with the names of its ancestors.
fn routable_with_ancestors(tree: &VisibleTree) -> Vec<(String, Vec<String>)> {
    fn walk(node: &VisibleNode, ancestors: &mut Vec<String>, out: &mut Vec<(String, Vec<String>)>) {
        if let Some(path) = node.path() {
            out.push((path.to_string(), ancestors.clone()));
        }
        ancestors.push(node.name().to_string());
        for child in node.children() {
            walk(child, ancestors, out);
        }
        ancestors.pop();
    }

    let mut out = Vec::new();
    for root in tree.roots() {
        walk(root, &mut Vec::new(), &mut out);
    }
    out
}

fn kept_for_a_reason(node: &VisibleNode, capabilities: &ResolvedCapabilitySet) -> bool {
    let own_gate = node
        .required_capability()
        .is_none_or(|requirement| capabilities.contains(&requirement.name));
    (own_gate || !node.children().is_empty())
        && node.children().iter().all(|child| kept_for_a_reason(child, capabilities))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Fail-closed
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn loading_always_yields_an_empty_tree(tree in tree_strategy(), mask in capability_set_strategy()) {
        prop_assert!(filter_tree(&tree, &to_set(&mask), true).is_empty());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Monotonicity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn more_capabilities_never_hide_nodes(
        tree in tree_strategy(),
        larger in capability_set_strategy(),
        keep in capability_set_strategy(),
    ) {
        let smaller: Vec<bool> = larger.iter().zip(&keep).map(|(held, kept)| *held && *kept).collect();
        let (small, large) = (to_set(&smaller), to_set(&larger));
        prop_assert!(small.is_subset(&large));

        let small_tree = filter_tree(&tree, &small, false);
        let large_tree = filter_tree(&tree, &large, false);
        prop_assert!(
            small_tree.is_subtree_of(&large_tree),
            "{:?} is not a subtree of {:?}",
            small_tree,
            large_tree
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. No orphans
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn visible_nodes_keep_their_ancestors(tree in tree_strategy(), mask in capability_set_strategy()) {
        let capabilities = to_set(&mask);
        let visible = filter_tree(&tree, &capabilities, false);

        let unfiltered = filter_tree(&tree, &everything(), false);
        prop_assert_eq!(unfiltered.len(), tree.iter().count());
        prop_assert!(visible.is_subtree_of(&unfiltered));
        prop_assert!(visible.roots().iter().all(|node| kept_for_a_reason(node, &capabilities)));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Idempotence
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn filtering_is_deterministic(tree in tree_strategy(), mask in capability_set_strategy()) {
        let capabilities = to_set(&mask);
        prop_assert_eq!(
            filter_tree(&tree, &capabilities, false),
            filter_tree(&tree, &capabilities, false)
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Auto-expand coverage
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn active_route_ancestors_are_expanded(
        tree in tree_strategy(),
        mask in capability_set_strategy(),
        pick in any::<Index>(),
    ) {
        let visible = filter_tree(&tree, &to_set(&mask), false);
        let candidates = routable_with_ancestors(&visible);
        prop_assume!(!candidates.is_empty());

        let (route, ancestors) = &candidates[pick.index(candidates.len())];
        let expanded = auto_expanded_names(&visible, route);
        for ancestor in ancestors {
            prop_assert!(expanded.contains(ancestor), "{} not expanded for {}", ancestor, route);
        }
    }
}
