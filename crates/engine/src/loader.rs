//! Background catalog fetching.
//!
//! The loader turns [`Effect::FetchCatalog`](crate::Effect::FetchCatalog)
//! into a tokio task whose result comes back to the reducer as
//! [`Msg::CatalogLoaded`]. There is no cancellation; superseded results are
//! discarded by generation when they arrive.

use std::sync::Arc;

use opsdash_api::CapabilitySource;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::catalog::FetchRequest;
use crate::session::Msg;

#[derive(Clone)]
pub struct CatalogLoader {
    source: Arc<dyn CapabilitySource>,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CapabilitySource>) -> Self {
        Self { source }
    }

    /// Starts the fetch described by `request` and reports back on `sender`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&self, request: FetchRequest, sender: UnboundedSender<Msg>) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let FetchRequest { generation, credential } = request;
            debug!(generation, "fetching capability catalog");
            let result = source.fetch_capabilities(&credential).await;
            if sender.send(Msg::CatalogLoaded { generation, result }).is_err() {
                debug!(generation, "session closed before the catalog arrived");
            }
        })
    }
}

impl std::fmt::Debug for CatalogLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogLoader").finish_non_exhaustive()
    }
}
