//! # Opsdash Engine
//!
//! The engine decides which navigation nodes exist for the current user, which
//! of them are expanded, and which one is active. It is fed by three outside
//! collaborators: the session provider (credential and user), the permission
//! service (capability catalog) and the router (current route).
//!
//! ## Data flow
//!
//! credential → [`CapabilityCatalog`] → [`PermissionResolver`] (with the
//! user's capability references) → [`filter_tree`] over the static
//! [`NavigationTree`](opsdash_registry::NavigationTree) → [`ExpansionController`]
//! (with the current route) → [`SidebarSnapshot`] for rendering.
//!
//! All of it is driven through [`NavigationSession::update`], a single
//! reducer over [`Msg`] values that returns [`Effect`]s for the host to run.
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use opsdash_engine::{Effect, Msg, NavigationSession};
//! use opsdash_registry::NavigationTree;
//! use opsdash_types::{CapabilityRecord, SessionUser};
//!
//! let mut session = NavigationSession::new(Arc::new(NavigationTree::builtin()));
//! session.update(Msg::UserChanged(SessionUser::with_refs([1u64])));
//!
//! let effects = session.update(Msg::CredentialChanged(Some("token".into())));
//! let Some(Effect::FetchCatalog(request)) = effects.into_iter().next() else {
//!     panic!("a credential starts a catalog fetch");
//! };
//! assert!(session.visible_tree().is_empty(), "nothing is shown while loading");
//!
//! session.update(Msg::CatalogLoaded {
//!     generation: request.generation,
//!     result: Ok(vec![CapabilityRecord::new(1u64, "reports")]),
//! });
//! session.update(Msg::RouteChanged("/reports/amazon/settlements".into()));
//!
//! let snapshot = session.snapshot();
//! assert!(snapshot.expansion.is_expanded("Amazon Reports"));
//! assert!(snapshot.rows.iter().any(|row| row.name == "Settlements" && row.active));
//! ```
//!
//! ## Modules
//!
//! - **`catalog`**: catalog lifecycle and fetch generations
//! - **`resolve`**: capability references to names, memoized
//! - **`filter`**: the fail-closed, bottom-up tree filter
//! - **`route`**: active-route matching
//! - **`expansion`**: expanded groups and sidebar width
//! - **`session`**: the reducer tying it together
//! - **`view`**: sidebar rows and text rendering
//! - **`loader`**: the tokio boundary for catalog fetches
//! - **`notifications`**: transient operator messages

pub mod catalog;
pub mod expansion;
pub mod filter;
pub mod loader;
pub mod notifications;
pub mod resolve;
pub mod route;
pub mod session;
pub mod view;

pub use catalog::{CapabilityCatalog, CatalogRecords, CatalogStatus, CatalogUpdate, FetchRequest};
pub use expansion::{ExpansionController, ExpansionEvent, ExpansionState, auto_expanded_names};
pub use filter::{VisibleNode, VisibleTree, filter_tree};
pub use loader::CatalogLoader;
pub use notifications::{DEFAULT_NOTIFICATION_TTL, NotificationCenter};
pub use resolve::{PermissionResolver, ResolvedCapabilitySet, resolve};
pub use route::{contains_active_descendant, is_active};
pub use session::{Effect, INITIAL_ROUTE, Msg, NavigationSession, SidebarSnapshot};
pub use view::{SidebarRow, flatten, render_text};
