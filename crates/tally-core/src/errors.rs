//! Cross-cutting error types for Tally.
//!
//! Transport and configuration failures live in their own crates
//! (`TransportError`, `ConfigError`); everything converges on `anyhow` in
//! `tally-cli`.

use thiserror::Error;

/// Errors that can be raised while building core values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A filter field name did not match any known field.
    #[error("Unknown filter field: {0}")]
    UnknownField(String),

    /// A value could not be parsed into the expected shape.
    #[error("Invalid {kind}: {value}")]
    InvalidValue { kind: &'static str, value: String },
}
