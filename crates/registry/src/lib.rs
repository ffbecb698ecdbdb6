//! Navigation registry for the Opsdash sidebar.
//!
//! This crate owns the static side of navigation: the compiled-in dashboard
//! menu, loading an operator-supplied tree from YAML or JSON, structural
//! validation, and the dashboard configuration file that points at both the
//! tree and the permission service.

pub mod builtin;
pub mod config;
pub mod tree;

pub use config::{CONFIG_PATH_ENV, DashboardConfig};
pub use opsdash_types::{CapabilityRequirement, NavigationNode, NodeKind};
pub use tree::{IssueSeverity, NavigationTree, TreeError, TreeIssue, TreeIssues};

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

/// Loads the navigation tree named by `config`, or the built-in menu when the
/// configuration does not point at a file.
pub fn load_navigation(config: &DashboardConfig) -> Result<Arc<NavigationTree>> {
    let tree = match config.navigation_path() {
        Some(path) => NavigationTree::from_path(path)?,
        None => {
            debug!("using built-in navigation tree");
            NavigationTree::builtin()
        }
    };
    Ok(Arc::new(tree))
}
