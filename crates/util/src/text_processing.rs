//! # Text Processing Utilities
//!
//! Redaction of credential-looking values before text reaches logs,
//! notifications, or error messages.

use once_cell::sync::Lazy;
use regex::Regex;

/// Redacts values that look like secrets in a string.
///
/// Bearer credentials, `Authorization` header values, and `KEY=value` style
/// assignments whose key mentions a token, key, secret, or password are
/// replaced with `[REDACTED]`. Key names are preserved.
///
/// # Example
/// ```rust
/// use opsdash_util::redact_sensitive;
///
/// assert_eq!(redact_sensitive("OPSDASH_API_TOKEN=abc123"), "OPSDASH_API_TOKEN=[REDACTED]");
/// assert_eq!(redact_sensitive("Authorization: Bearer abc.def"), "Authorization: [REDACTED]");
/// ```
pub fn redact_sensitive(input: &str) -> String {
    redact_sensitive_with(input, "[REDACTED]")
}

/// Redacts sensitive-looking values, using a custom replacement token.
pub fn redact_sensitive_with(input: &str, replacement: &str) -> String {
    let mut redacted = input.to_string();

    for pattern in redact_patterns().iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}{replacement}")
            })
            .to_string();
    }

    redacted
}

/// Compiled patterns, ordered from most specific to most general. Each has the
/// preserved prefix in capture group 1 and the secret in group 2.
fn redact_patterns() -> &'static Vec<Regex> {
    static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            r"(?i)(authorization:\s*)((?:bearer|basic)\s+[^\s,;]+|[^\s,;]+)",
            r"(?i)(bearer\s+)([A-Za-z0-9\-._~+/]+=*)",
            r#"(?i)([A-Z0-9_]*(?:KEY|TOKEN|SECRET|PASSWORD|CREDENTIAL)\s*[=:]\s*"?)([^\s"]+)"#,
        ]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
    });

    &REDACT_PATTERNS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_bearer_tokens_inside_sentences() {
        let message = "request failed with bearer eyJhbGciOi.payload.sig attached";
        let redacted = redact_sensitive(message);
        assert_eq!(redacted, "request failed with bearer [REDACTED] attached");
    }

    #[test]
    fn redacts_token_assignments_and_keeps_keys() {
        let redacted = redact_sensitive("OPSDASH_API_TOKEN=s3cr3t other=value");
        assert_eq!(redacted, "OPSDASH_API_TOKEN=[REDACTED] other=value");
    }

    #[test]
    fn leaves_plain_text_untouched() {
        let message = "Could not load permissions: connection refused";
        assert_eq!(redact_sensitive(message), message);
    }

    #[test]
    fn custom_replacement_is_used() {
        assert_eq!(redact_sensitive_with("Authorization: Bearer abc", "<redacted>"), "Authorization: <redacted>");
    }
}
