//! Shared type definitions for the Opsdash navigation subsystem.
//!
//! These types are consumed by the registry (static navigation tree), the API
//! client (capability catalog), and the engine (filtering, expansion, session
//! state). Everything here is plain data with serde derives; behavior lives in
//! the crates that own each concern.

pub mod capability;
pub mod navigation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use capability::{CapabilityId, CapabilityRecord, SessionUser};
pub use navigation::{CapabilityRequirement, NavigationNode, NodeKind};

/// Severity of a transient, user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A non-blocking message surfaced to the operator (for example, when the
/// capability catalog could not be loaded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// How prominently the message should be displayed.
    pub level: NotificationLevel,
    /// Human-readable message. Never contains credentials.
    pub message: String,
    /// Time the notification was raised; used for expiry.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a notification stamped with the current time.
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_level_serializes_lowercase() {
        let notification = Notification::warning("Could not load permissions");
        let json = serde_json::to_value(&notification).expect("serialize notification");
        assert_eq!(json["level"], "warning");
        assert_eq!(json["message"], "Could not load permissions");
    }
}
