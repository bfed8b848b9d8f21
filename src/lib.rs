// ============================================================================
// lib.rs — ArcadeKit
// 2D game support: frame-synchronous keyboard state and cached image assets.
// ============================================================================

pub mod app;
pub mod assets;
pub mod config;
pub mod error;
pub mod input;
pub mod keys;
pub mod platform;
pub mod replay;

pub use assets::{scaled_dimensions, AssetCache, Bounds, MAX_SCALED_PIXELS};
pub use config::KeyBindings;
pub use error::{AssetError, ConfigError};
pub use input::{KeyFrame, KeyStateTracker};
pub use keys::{KeyMap, LogicalKey};
