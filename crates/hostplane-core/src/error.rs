//! Error types for hostplane configuration and parsing.

use thiserror::Error;

/// Errors raised while interpreting configuration values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid group version {0:?}: expected \"group/version\" or \"version\"")]
    InvalidGroupVersion(String),

    #[error("invalid api port {0}: must be in 1..=65535")]
    InvalidApiPort(i32),
}
