//! Render model: the visible tree flattened into sidebar rows.

use std::fmt::Write as _;

use serde::Serialize;

use crate::expansion::ExpansionState;
use crate::filter::{VisibleNode, VisibleTree};
use crate::route::{contains_active_descendant, is_active};

/// One line of the sidebar as the renderer draws it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarRow {
    pub name: String,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub depth: usize,
    pub expandable: bool,
    pub expanded: bool,
    pub active: bool,
    pub contains_active: bool,
}

/// Flattens `tree` into rows; children appear only under expanded rows.
///
/// Expansion names that no longer match an expandable visible node are
/// ignored, and collapsed-width mode hides every submenu.
pub fn flatten(tree: &VisibleTree, expansion: &ExpansionState, route: &str) -> Vec<SidebarRow> {
    let mut rows = Vec::with_capacity(tree.roots().len());
    for node in tree.roots() {
        push_rows(node, 0, expansion, route, &mut rows);
    }
    rows
}

fn push_rows(node: &VisibleNode, depth: usize, expansion: &ExpansionState, route: &str, rows: &mut Vec<SidebarRow>) {
    let expandable = node.is_expandable();
    let expanded = expandable && !expansion.collapsed_width() && expansion.is_expanded(node.name());
    rows.push(SidebarRow {
        name: node.name().to_string(),
        path: node.path().map(str::to_string),
        icon: node.icon().map(str::to_string),
        depth,
        expandable,
        expanded,
        active: is_active(node.path(), route),
        contains_active: contains_active_descendant(node, route),
    });
    if expanded {
        for child in node.children() {
            push_rows(child, depth + 1, expansion, route, rows);
        }
    }
}

/// Plain-text sidebar for terminals.
///
/// ```text
/// ▾ Items
///     Amazon *
///     Walmart
/// ▸ Reports
///   Settings
/// ```
pub fn render_text(rows: &[SidebarRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let marker = match (row.expandable, row.expanded) {
            (true, true) => "▾ ",
            (true, false) => "▸ ",
            _ => "  ",
        };
        let indent = "  ".repeat(row.depth);
        let active = if row.active { " *" } else { "" };
        let _ = writeln!(out, "{indent}{marker}{}{active}", row.name);
    }
    out
}
