//! Error types for quteinit.

use std::io;

/// Errors produced while loading the configuration profile.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("cache read failure at {path}: {reason}")]
    CacheRead { path: String, reason: String },

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("option {path} is not a {expected}")]
    TypeMismatch { path: String, expected: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_color_display() {
        let e = Error::InvalidColor("teal-ish".into());
        assert_eq!(format!("{e}"), "invalid color: teal-ish");
    }

    #[test]
    fn network_failure_display() {
        let e = Error::NetworkFailure("connection refused".into());
        assert_eq!(format!("{e}"), "network failure: connection refused");
    }

    #[test]
    fn cache_read_display() {
        let e = Error::CacheRead {
            path: "/tmp/bangs.json".into(),
            reason: "truncated".into(),
        };
        assert_eq!(
            format!("{e}"),
            "cache read failure at /tmp/bangs.json: truncated"
        );
    }

    #[test]
    fn unknown_option_display() {
        let e = Error::UnknownOption("tabs.nope".into());
        assert_eq!(format!("{e}"), "unknown option: tabs.nope");
    }
}
