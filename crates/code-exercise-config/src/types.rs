//! Core type definitions for configuration handling.

use thiserror::Error;

/// A configuration object: string keys to JSON values.
pub type ConfigMap = serde_json::Map<String, serde_json::Value>;

/// Errors that can occur during configuration operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration nesting exceeds maximum depth.
    #[error("Config nesting too deep (max depth: {max_depth}) at path: {}", path.join("."))]
    NestingTooDeep {
        /// Maximum allowed depth
        max_depth: usize,
        /// Path where the limit was exceeded
        path: Vec<String>,
    },

    /// The merged plugin options do not have the expected shape.
    #[error("Invalid plugin options: {message}")]
    InvalidOptions {
        /// Deserializer message
        message: String,
    },
}
