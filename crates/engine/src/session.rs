//! The navigation session: one reducer folding session, catalog, route and
//! UI events into the sidebar state.
//!
//! Everything here is synchronous. The only asynchronous step, fetching the
//! capability catalog, leaves the reducer as [`Effect::FetchCatalog`] and
//! comes back as [`Msg::CatalogLoaded`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use opsdash_api::CatalogError;
use opsdash_registry::NavigationTree;
use opsdash_types::{CapabilityId, CapabilityRecord, Notification, SessionUser};
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{CapabilityCatalog, CatalogStatus, CatalogUpdate, FetchRequest};
use crate::expansion::{ExpansionController, ExpansionEvent, ExpansionState};
use crate::filter::{VisibleTree, filter_tree};
use crate::notifications::NotificationCenter;
use crate::resolve::{PermissionResolver, ResolvedCapabilitySet};
use crate::view::{SidebarRow, flatten};

/// Route assumed until the routing collaborator reports one.
pub const INITIAL_ROUTE: &str = "/";

/// Inputs to [`NavigationSession::update`].
#[derive(Debug, Clone)]
pub enum Msg {
    /// The session provider's bearer credential changed (None on logout).
    CredentialChanged(Option<String>),
    /// The session provider reported a new current user.
    UserChanged(SessionUser),
    /// A catalog fetch finished.
    CatalogLoaded {
        generation: u64,
        result: Result<Vec<CapabilityRecord>, CatalogError>,
    },
    /// The router navigated.
    RouteChanged(String),
    /// A group header was clicked.
    ToggleNode(String),
    /// The collapse-width control was clicked.
    ToggleWidth,
    /// A row was clicked; the router decides whether to follow.
    NavigateTo(String),
}

/// Side effects requested by the reducer, run by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchCatalog(FetchRequest),
    Navigate(String),
    Notify(Notification),
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct SidebarSnapshot {
    pub visible_tree: VisibleTree,
    pub expansion: ExpansionState,
    pub current_route: String,
    pub rows: Vec<SidebarRow>,
    pub catalog_status: CatalogStatus,
    pub notifications: Vec<Notification>,
}

#[derive(Debug)]
pub struct NavigationSession {
    tree: Arc<NavigationTree>,
    catalog: CapabilityCatalog,
    user_refs: Arc<[CapabilityId]>,
    resolver: PermissionResolver,
    resolved: Arc<ResolvedCapabilitySet>,
    visible: VisibleTree,
    current_route: String,
    expansion: ExpansionController,
    notifications: NotificationCenter,
}

impl NavigationSession {
    /// A session with no credential, no user and nothing visible.
    pub fn new(tree: Arc<NavigationTree>) -> Self {
        Self {
            tree,
            catalog: CapabilityCatalog::new(),
            user_refs: Arc::from(Vec::new()),
            resolver: PermissionResolver::new(),
            resolved: Arc::new(ResolvedCapabilitySet::new()),
            visible: VisibleTree::default(),
            current_route: INITIAL_ROUTE.to_string(),
            expansion: ExpansionController::new(),
            notifications: NotificationCenter::default(),
        }
    }

    pub fn with_notification_ttl(mut self, ttl: Duration) -> Self {
        self.notifications = NotificationCenter::new(ttl);
        self
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        self.notifications.prune(Utc::now());
        let mut effects = Vec::new();
        match msg {
            Msg::CredentialChanged(credential) => {
                if let Some(request) = self.catalog.set_credential(credential) {
                    effects.push(Effect::FetchCatalog(request));
                }
                self.refresh_visible();
            }
            Msg::UserChanged(user) => {
                self.user_refs = Arc::from(user.capability_refs);
                self.refresh_visible();
            }
            Msg::CatalogLoaded { generation, result } => match self.catalog.apply(generation, result) {
                CatalogUpdate::Stale => {}
                CatalogUpdate::Loaded(count) => {
                    info!(count, "permissions loaded");
                    self.refresh_visible();
                }
                CatalogUpdate::Failed(error) => {
                    let notification = Notification::warning(format!("Could not load permissions: {error}"));
                    self.notifications.push(notification.clone());
                    effects.push(Effect::Notify(notification));
                    self.refresh_visible();
                }
            },
            Msg::RouteChanged(route) => {
                if route != self.current_route {
                    self.current_route = route;
                    self.recompute_expansion();
                }
            }
            Msg::ToggleNode(name) => {
                self.expansion.apply(ExpansionEvent::ToggleNode {
                    tree: &self.visible,
                    name: &name,
                });
            }
            Msg::ToggleWidth => {
                self.expansion.apply(ExpansionEvent::ToggleWidth);
            }
            Msg::NavigateTo(path) => effects.push(Effect::Navigate(path)),
        }
        effects
    }

    pub fn tree(&self) -> &Arc<NavigationTree> {
        &self.tree
    }

    pub fn visible_tree(&self) -> &VisibleTree {
        &self.visible
    }

    pub fn resolved_capabilities(&self) -> &ResolvedCapabilitySet {
        &self.resolved
    }

    pub fn expansion(&self) -> &ExpansionState {
        self.expansion.state()
    }

    pub fn current_route(&self) -> &str {
        &self.current_route
    }

    pub fn catalog(&self) -> &CapabilityCatalog {
        &self.catalog
    }

    pub fn snapshot(&self) -> SidebarSnapshot {
        SidebarSnapshot {
            visible_tree: self.visible.clone(),
            expansion: self.expansion.state().clone(),
            current_route: self.current_route.clone(),
            rows: flatten(&self.visible, self.expansion.state(), &self.current_route),
            catalog_status: self.catalog.status().clone(),
            notifications: self.notifications.active(Utc::now()).into_iter().cloned().collect(),
        }
    }

    /// Rebuilds the visible tree; a changed tree re-runs auto-expansion.
    fn refresh_visible(&mut self) {
        self.resolved = self.resolver.resolve(&self.user_refs, self.catalog.records());
        let visible = filter_tree(&self.tree, &self.resolved, !self.catalog.is_loaded());
        if visible != self.visible {
            debug!(nodes = visible.len(), "visible tree changed");
            self.visible = visible;
            self.recompute_expansion();
        }
    }

    fn recompute_expansion(&mut self) {
        self.expansion.apply(ExpansionEvent::Recompute {
            tree: &self.visible,
            route: &self.current_route,
        });
    }
}
