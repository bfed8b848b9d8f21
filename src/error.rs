// ============================================================================
// error.rs — ArcadeKit
// Typed failures for asset loading and key-binding configuration.
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

use crate::keys::LogicalKey;

/// Why an asset could not be produced. `Clone` so the cache can hand out the
/// same memoized failure on every lookup.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("Asset not found: {name}")]
    NotFound { name: String },

    #[error("Failed to read asset {name}: {reason}")]
    Unreadable { name: String, reason: String },

    #[error("Failed to decode asset {name}: {reason}")]
    Decode { name: String, reason: String },

    #[error("Asset {name} has a zero dimension")]
    Empty { name: String },

    #[error("Scaling {name} yields a degenerate {width}x{height} image")]
    DegenerateScale { name: String, width: u32, height: u32 },

    #[error("Scaling {name} to {width}x{height} exceeds the pixel limit")]
    ScaleTooLarge { name: String, width: u32, height: u32 },
}

impl AssetError {
    /// Name of the asset the failure belongs to.
    pub fn asset_name(&self) -> &str {
        match self {
            AssetError::NotFound { name }
            | AssetError::Unreadable { name, .. }
            | AssetError::Decode { name, .. }
            | AssetError::Empty { name }
            | AssetError::DegenerateScale { name, .. }
            | AssetError::ScaleTooLarge { name, .. } => name,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Key {code} is bound to both {first:?} and {second:?}")]
    DuplicateBinding {
        code: String,
        first: LogicalKey,
        second: LogicalKey,
    },
}
