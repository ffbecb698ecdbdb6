//! Small helpers shared by the Opsdash crates: filesystem path resolution for
//! configuration files and credential redaction for anything that may end up
//! in logs or notifications.

pub mod path_processing;
pub mod text_processing;

pub use path_processing::{config_file_path, expand_tilde};
pub use text_processing::{redact_sensitive, redact_sensitive_with};
