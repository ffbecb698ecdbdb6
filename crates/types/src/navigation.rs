//! Static navigation tree node definitions.
//!
//! A [`NavigationNode`] is one entry of the compile-time (or config-file)
//! defined sidebar menu. Nodes are immutable once the tree is built; the
//! per-user visible tree is always derived from them, never written back.

use serde::{Deserialize, Serialize};

/// The single capability a node requires in order to be shown.
///
/// There is no AND/OR composition: a node requires zero or exactly one named
/// capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RequirementRepr")]
pub struct CapabilityRequirement {
    pub name: String,
}

impl CapabilityRequirement {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Authoring shorthand: `requires: reports` or `requires: { name: reports }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RequirementRepr {
    Name(String),
    Struct { name: String },
}

impl From<RequirementRepr> for CapabilityRequirement {
    fn from(repr: RequirementRepr) -> Self {
        match repr {
            RequirementRepr::Name(name) | RequirementRepr::Struct { name } => Self { name },
        }
    }
}

/// Structural classification of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Routable entry without children.
    Leaf,
    /// Node holding at least one child; expandable in the sidebar.
    Group,
    /// Neither a path nor children. A configuration defect that renders as an
    /// inert entry: never active, never expandable.
    DeadEnd,
}

/// One entry in the static navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationNode {
    /// Display label. Also the node's identity among its siblings.
    pub name: String,
    /// Routable path; `None` for pure grouping nodes.
    #[serde(default)]
    pub path: Option<String>,
    /// Capability gating this node; `None` means always visible.
    #[serde(default, rename = "required_capability", alias = "requires")]
    pub required_capability: Option<CapabilityRequirement>,
    /// Optional icon hint passed through to rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Ordered children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavigationNode>,
}

impl NavigationNode {
    /// Creates a routable leaf.
    pub fn leaf(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
            required_capability: None,
            icon: None,
            children: Vec::new(),
        }
    }

    /// Creates a pure grouping node without a path.
    pub fn group(name: impl Into<String>, children: Vec<NavigationNode>) -> Self {
        Self {
            name: name.into(),
            path: None,
            required_capability: None,
            icon: None,
            children,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Gates this node behind the named capability.
    pub fn requires(mut self, capability: impl Into<String>) -> Self {
        self.required_capability = Some(CapabilityRequirement::new(capability));
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn kind(&self) -> NodeKind {
        if !self.children.is_empty() {
            NodeKind::Group
        } else if self.path.is_some() {
            NodeKind::Leaf
        } else {
            NodeKind::DeadEnd
        }
    }

    /// Whether the node can be expanded in the sidebar.
    pub fn is_expandable(&self) -> bool {
        self.kind() == NodeKind::Group
    }

    /// Name of the required capability, if any.
    pub fn required_capability_name(&self) -> Option<&str> {
        self.required_capability.as_ref().map(|requirement| requirement.name.as_str())
    }
}
