//! # Map Error Types
//!
//! Errors raised while building a map from configuration.
//!
//! Hot-path operations (point mutation, clip queries, column decoding) never
//! return these: they fail silently with a safe default instead.

use thiserror::Error;

/// Errors that can occur while configuring a map.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A configuration value is out of its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration text is not valid TOML for [`crate::MapConfig`].
    #[error("failed to parse map configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Requested horizontal extent cannot be allocated.
    #[error("invalid map dimensions: size {size}")]
    InvalidDimensions {
        /// Requested edge length in voxels.
        size: u32,
    },
}

/// Result type for map configuration.
pub type MapResult<T> = Result<T, MapError>;
