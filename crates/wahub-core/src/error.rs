// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Wahub session control plane.

use thiserror::Error;

/// The primary error type used across all Wahub crates.
///
/// Variants map the failure taxonomy of the session layer: connection
/// failures are recoverable via the reconnect policy, caller-input errors
/// surface synchronously from the control-surface call, and dispatch-time
/// failures are reported to the conversation rather than the caller.
#[derive(Debug, Error)]
pub enum WahubError {
    /// Configuration errors (invalid TOML, missing required fields, bad paths).
    #[error("configuration error: {0}")]
    Config(String),

    /// Underlying protocol connection failure (open, transition, send).
    #[error("connection error: {message}")]
    Connection {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed caller input for authentication (bad phone number, missing
    /// pairing input). Reported synchronously; no session state change.
    #[error("auth input error: {0}")]
    AuthInput(String),

    /// Dispatch-time scope or role check failure.
    #[error("permission denied: {0}")]
    Permission(String),

    /// A command handler failed during execution.
    #[error("handler '{command}' failed: {message}")]
    Handler { command: String, message: String },

    /// Credential, settings, or stats write failure. Best-effort; never
    /// blocks the in-memory transition that triggered it.
    #[error("persistence error: {source}")]
    Persistence {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A per-hub resource limit was hit (tenant capacity, reconnect budget).
    #[error("resource limit reached for tenant {tenant}: {message}")]
    ResourceExhausted { tenant: String, message: String },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WahubError {
    /// Shorthand for a connection error without an underlying source.
    pub fn connection(message: impl Into<String>) -> Self {
        WahubError::Connection {
            message: message.into(),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_construct_and_display() {
        let e = WahubError::Config("missing data_dir".into());
        assert!(e.to_string().contains("configuration error"));

        let e = WahubError::connection("socket closed");
        assert!(e.to_string().contains("socket closed"));

        let e = WahubError::AuthInput("phone number must be 10-15 digits".into());
        assert!(e.to_string().starts_with("auth input error"));

        let e = WahubError::Handler {
            command: "kick".into(),
            message: "boom".into(),
        };
        assert!(e.to_string().contains("kick"));

        let e = WahubError::ResourceExhausted {
            tenant: "t1".into(),
            message: "tenant capacity reached".into(),
        };
        assert!(e.to_string().contains("t1"));
    }

    #[test]
    fn persistence_error_wraps_source() {
        let e = WahubError::Persistence {
            source: Box::new(std::io::Error::other("disk full")),
        };
        assert!(e.to_string().contains("disk full"));
    }
}
