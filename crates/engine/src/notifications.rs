//! Transient operator notifications with a time-to-live.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use opsdash_types::Notification;

/// How long a notification stays visible unless configured otherwise.
pub const DEFAULT_NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct NotificationCenter {
    ttl: TimeDelta,
    entries: VecDeque<Notification>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            entries: VecDeque::new(),
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.entries.push_back(notification);
    }

    /// Notifications still live at `now`, oldest first.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<&Notification> {
        self.entries.iter().filter(|entry| !self.expired(entry, now)).collect()
    }

    /// Drops expired notifications; returns how many were removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|entry| !is_expired(entry.created_at, ttl, now));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn expired(&self, entry: &Notification, now: DateTime<Utc>) -> bool {
        is_expired(entry.created_at, self.ttl, now)
    }
}

fn is_expired(created_at: DateTime<Utc>, ttl: TimeDelta, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(created_at) >= ttl
}
