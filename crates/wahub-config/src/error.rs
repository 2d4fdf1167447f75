// SPDX-FileCopyrightText: 2026 Wahub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed configuration errors.

use thiserror::Error;

/// A configuration problem found while loading or validating.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment failed to parse or merge the layered sources.
    #[error("configuration parse error: {0}")]
    Parse(#[from] Box<figment::Error>),

    /// A semantic constraint the model types cannot express.
    #[error("invalid configuration: {message}")]
    Validation { message: String },
}

/// Renders a batch of errors one per line, for CLI output.
pub fn render_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}
