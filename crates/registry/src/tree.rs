//! The static navigation tree and its validation rules.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use opsdash_types::{NavigationNode, NodeKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Immutable n-ary tree of navigation nodes, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTree {
    pub roots: Vec<NavigationNode>,
}

/// How serious a [`TreeIssue`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// The tree must not be used.
    Error,
    /// The tree is usable; the node degrades gracefully.
    Warning,
}

/// A structural problem found by [`NavigationTree::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeIssue {
    /// Two siblings share a name, which is their identity key.
    DuplicateSibling { parent: Option<String>, name: String },
    /// A node with neither a path nor children.
    DeadEnd { name: String },
}

impl TreeIssue {
    pub fn severity(&self) -> IssueSeverity {
        match self {
            Self::DuplicateSibling { .. } => IssueSeverity::Error,
            Self::DeadEnd { .. } => IssueSeverity::Warning,
        }
    }
}

impl fmt::Display for TreeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateSibling { parent: Some(parent), name } => {
                write!(f, "duplicate sibling '{name}' under '{parent}'")
            }
            Self::DuplicateSibling { parent: None, name } => write!(f, "duplicate top-level entry '{name}'"),
            Self::DeadEnd { name } => write!(f, "'{name}' has neither a path nor children"),
        }
    }
}

/// Display helper joining several issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeIssues(pub Vec<TreeIssue>);

impl fmt::Display for TreeIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, issue) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("navigation tree is invalid: {0}")]
    Invalid(TreeIssues),

    #[error("could not parse navigation tree: {0}")]
    Parse(String),
}

/// Accepted document shapes: a bare list of nodes, or the list under a
/// `navigation` key.
#[derive(Deserialize)]
#[serde(untagged)]
enum TreeDocument {
    List(Vec<NavigationNode>),
    Wrapped { navigation: Vec<NavigationNode> },
}

impl From<TreeDocument> for NavigationTree {
    fn from(document: TreeDocument) -> Self {
        match document {
            TreeDocument::List(roots) | TreeDocument::Wrapped { navigation: roots } => Self { roots },
        }
    }
}

impl NavigationTree {
    pub fn new(roots: Vec<NavigationNode>) -> Self {
        Self { roots }
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self, TreeError> {
        let document: TreeDocument = serde_yaml::from_str(content).map_err(|error| TreeError::Parse(error.to_string()))?;
        Self::from(document).validated()
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self, TreeError> {
        let document: TreeDocument = serde_json::from_str(content).map_err(|error| TreeError::Parse(error.to_string()))?;
        Self::from(document).validated()
    }

    /// Loads a tree from disk. `.json` files are parsed as JSON, anything else
    /// as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read navigation tree: {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|extension| extension.to_str())
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        let tree = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        };
        tree.with_context(|| format!("Invalid navigation tree: {}", path.display()))
    }

    /// Rejects trees with errors and logs warnings.
    pub fn validated(self) -> Result<Self, TreeError> {
        let (errors, warnings): (Vec<_>, Vec<_>) = self
            .validate()
            .into_iter()
            .partition(|issue| issue.severity() == IssueSeverity::Error);
        for issue in &warnings {
            warn!(%issue, "navigation tree warning");
        }
        if !errors.is_empty() {
            return Err(TreeError::Invalid(TreeIssues(errors)));
        }
        Ok(self)
    }

    /// Reports every structural issue, in depth-first order.
    pub fn validate(&self) -> Vec<TreeIssue> {
        let mut issues = Vec::new();
        check_siblings(None, &self.roots, &mut issues);
        issues
    }

    /// Depth-first, pre-order traversal yielding `(depth, node)`.
    pub fn iter(&self) -> TreeIter<'_> {
        TreeIter {
            stack: self.roots.iter().rev().map(|node| (0, node)).collect(),
        }
    }

    /// Distinct capability names referenced anywhere in the tree.
    pub fn required_capabilities(&self) -> BTreeSet<&str> {
        self.iter()
            .filter_map(|(_, node)| node.required_capability_name())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

fn check_siblings(parent: Option<&str>, siblings: &[NavigationNode], issues: &mut Vec<TreeIssue>) {
    let mut seen = HashSet::new();
    for node in siblings {
        if !seen.insert(node.name.as_str()) {
            issues.push(TreeIssue::DuplicateSibling {
                parent: parent.map(str::to_string),
                name: node.name.clone(),
            });
        }
        if node.kind() == NodeKind::DeadEnd {
            issues.push(TreeIssue::DeadEnd { name: node.name.clone() });
        }
        check_siblings(Some(&node.name), &node.children, issues);
    }
}

/// Iterator returned by [`NavigationTree::iter`].
pub struct TreeIter<'a> {
    stack: Vec<(usize, &'a NavigationNode)>,
}

impl<'a> Iterator for TreeIter<'a> {
    type Item = (usize, &'a NavigationNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}
