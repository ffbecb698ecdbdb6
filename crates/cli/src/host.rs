//! Runs the session's effects: the CLI plays router, notifier and fetch host.

use std::collections::VecDeque;

use opsdash_engine::{CatalogLoader, CatalogStatus, Effect, Msg, NavigationSession};
use opsdash_types::{Notification, NotificationLevel};
use opsdash_util::redact_sensitive;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

pub struct Host {
    pub session: NavigationSession,
    loader: CatalogLoader,
    sender: UnboundedSender<Msg>,
}

impl Host {
    /// Returns the host and the receiver that catalog results arrive on.
    pub fn new(session: NavigationSession, loader: CatalogLoader) -> (Self, UnboundedReceiver<Msg>) {
        let (sender, receiver) = unbounded_channel();
        (Self { session, loader, sender }, receiver)
    }

    /// Feeds `msg` to the session and runs every effect it produces.
    pub fn dispatch(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            for effect in self.session.update(msg) {
                match effect {
                    Effect::FetchCatalog(request) => {
                        self.loader.spawn(request, self.sender.clone());
                    }
                    // No real router here; navigation is immediate.
                    Effect::Navigate(path) => queue.push_back(Msg::RouteChanged(path)),
                    Effect::Notify(notification) => eprintln!("{}", notification_line(&notification)),
                }
            }
        }
    }

    /// Waits until no catalog fetch is pending.
    pub async fn settle(&mut self, receiver: &mut UnboundedReceiver<Msg>) {
        while matches!(self.session.catalog().status(), CatalogStatus::Loading { .. }) {
            match receiver.recv().await {
                Some(msg) => self.dispatch(msg),
                None => break,
            }
        }
    }
}

/// Notifications reach the terminal with credentials scrubbed.
fn notification_line(notification: &Notification) -> String {
    let label = match notification.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Warning => "warning",
        NotificationLevel::Error => "error",
    };
    format!("{label}: {}", redact_sensitive(&notification.message))
}
