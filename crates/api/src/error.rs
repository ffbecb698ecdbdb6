//! Error types for capability catalog fetches.

use opsdash_util::redact_sensitive;
use thiserror::Error;

/// Failure to load the capability catalog.
///
/// Every variant carries owned, already-redacted text so the error can travel
/// through the engine's message queue (`Clone`) and be shown to the operator
/// without leaking the bearer credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("credential rejected by the permission service (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("permission service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("could not reach the permission service: {message}")]
    Transport { message: String },

    #[error("unexpected capability catalog payload: {message}")]
    Decode { message: String },

    #[error("could not read capability catalog: {message}")]
    Io { message: String },
}

impl CatalogError {
    /// Create a transport error.
    pub fn transport(message: impl AsRef<str>) -> Self {
        Self::Transport {
            message: redact_sensitive(message.as_ref()),
        }
    }

    /// Create an HTTP status error.
    pub fn http(status: u16, message: impl AsRef<str>) -> Self {
        Self::Http {
            status,
            message: redact_sensitive(message.as_ref()),
        }
    }

    /// Create a payload decoding error.
    pub fn decode(message: impl AsRef<str>) -> Self {
        Self::Decode {
            message: redact_sensitive(message.as_ref()),
        }
    }

    /// Create a local I/O error.
    pub fn io(message: impl AsRef<str>) -> Self {
        Self::Io {
            message: redact_sensitive(message.as_ref()),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(error: serde_json::Error) -> Self {
        Self::decode(error.to_string())
    }
}
